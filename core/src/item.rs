//! Engine-side view of host item stacks
//!
//! Host adapters convert their native item representation into
//! [`ItemStack`] and back. The tag store models the host's opaque per-item
//! key/value metadata; only [`crate::brewing::codec`] and
//! [`crate::stands`] interpret it.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Material {
    Potion,
    SplashPotion,
    LingeringPotion,
    Redstone,
    Glowstone,
    BrewingStand,
    Other(String),
}

impl Material {
    /// Materials that can sit in a brewing station's consumable slots
    pub fn is_consumable(&self) -> bool {
        matches!(self, Self::Potion | Self::SplashPotion | Self::LingeringPotion)
    }
}

/// A single value in an item's tag store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    Flag(bool),
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemMeta {
    /// Host base potion type, e.g. `long_swiftness` or `strong_healing`
    pub base_potion: Option<String>,

    /// Explicit effect duration attached by the host, in ticks
    pub custom_duration_ticks: Option<u32>,

    /// Opaque namespaced key/value storage
    pub tags: BTreeMap<String, TagValue>,

    pub display_name: Option<String>,
    pub lore: Vec<String>,

    /// Hide the host's own effect/duration text on this item
    pub hide_host_effect_text: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    pub material: Material,
    pub amount: u32,
    pub meta: ItemMeta,
}

impl ItemStack {
    pub fn new(material: Material, amount: u32) -> Self {
        Self {
            material,
            amount,
            meta: ItemMeta::default(),
        }
    }

    /// A single drinkable potion of the given host base type
    pub fn potion(base_potion: &str) -> Self {
        let mut item = Self::new(Material::Potion, 1);
        item.meta.base_potion = Some(base_potion.to_string());
        item
    }

    pub fn with_custom_duration_ticks(mut self, ticks: u32) -> Self {
        self.meta.custom_duration_ticks = Some(ticks);
        self
    }

    pub fn tag(&self, key: &str) -> Option<&TagValue> {
        self.meta.tags.get(key)
    }

    pub fn tag_flag(&self, key: &str) -> bool {
        matches!(self.tag(key), Some(TagValue::Flag(true)))
    }

    pub fn tag_int(&self, key: &str) -> Option<i64> {
        match self.tag(key) {
            Some(TagValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn tag_text(&self, key: &str) -> Option<&str> {
        match self.tag(key) {
            Some(TagValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }
}
