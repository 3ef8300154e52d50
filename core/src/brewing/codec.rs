//! Item state codec
//!
//! The only place that knows how upgrade state is laid out in an item's tag
//! store. Everything else works with [`EncodedItemState`].
//!
//! Tag schema (all keys namespaced `brewmaster:`):
//!
//! | key                       | value | notes                              |
//! |---------------------------|-------|------------------------------------|
//! | `master`                  | flag  | set once, never cleared            |
//! | `effect`                  | text  | effect id or `fly`                 |
//! | `duration_level`          | int   | 0 when absent                      |
//! | `power_level`             | int   | 0 when absent; applied as amplifier|
//! | `duration_seconds`        | int   | resolved effect length             |
//! | `base_duration_seconds`   | int   | vanilla length snapshot            |

use brewmaster_types::formatting::{format_amplifier, format_remaining, to_roman};

use crate::effects::EffectKind;
use crate::host::TICKS_PER_SECOND;
use crate::item::{ItemStack, TagValue};

pub const TAG_MASTER: &str = "brewmaster:master";
pub const TAG_EFFECT: &str = "brewmaster:effect";
pub const TAG_DURATION_LEVEL: &str = "brewmaster:duration_level";
pub const TAG_POWER_LEVEL: &str = "brewmaster:power_level";
pub const TAG_DURATION_SECONDS: &str = "brewmaster:duration_seconds";
pub const TAG_BASE_DURATION_SECONDS: &str = "brewmaster:base_duration_seconds";

/// Keys owned by the codec; rewritten as a unit on every encode
const STATE_TAGS: &[&str] = &[
    TAG_MASTER,
    TAG_EFFECT,
    TAG_DURATION_LEVEL,
    TAG_POWER_LEVEL,
    TAG_DURATION_SECONDS,
    TAG_BASE_DURATION_SECONDS,
];

/// Vanilla length of a `long_` potion
pub const LONG_DURATION_SECS: u64 = 480;
/// Vanilla length of an instant effect
pub const INSTANT_DURATION_SECS: u64 = 1;
/// Vanilla length of anything else (and of flight without a duration tier)
pub const DEFAULT_DURATION_SECS: u64 = 180;

/// Upgrade state carried by an item
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedItemState {
    pub is_master: bool,
    /// `None` when the tag is missing or names an unsupported effect
    pub effect: Option<EffectKind>,
    pub duration_level: u32,
    pub power_level: u32,
    /// Resolved effect length; `None` on an un-upgraded item
    pub duration_secs: Option<u64>,
    /// Vanilla length captured before the first duration upgrade
    pub base_duration_secs: Option<u64>,
}

impl EncodedItemState {
    pub fn master(
        effect: EffectKind,
        duration_level: u32,
        power_level: u32,
        duration_secs: u64,
    ) -> Self {
        Self {
            is_master: true,
            effect: Some(effect),
            duration_level,
            power_level,
            duration_secs: Some(duration_secs),
            base_duration_secs: None,
        }
    }
}

/// Read upgrade state from an item.
///
/// Master items decode from their tags. A vanilla consumable yields a
/// provisional, non-master state whose effect is derived from its base
/// potion type (or `None` for water/awkward/etc.) and whose duration is
/// unresolved. Anything else returns `None`.
pub fn decode(item: &ItemStack) -> Option<EncodedItemState> {
    if item.tag_flag(TAG_MASTER) {
        return Some(EncodedItemState {
            is_master: true,
            effect: item.tag_text(TAG_EFFECT).and_then(EffectKind::parse),
            duration_level: read_level(item, TAG_DURATION_LEVEL),
            power_level: read_level(item, TAG_POWER_LEVEL),
            duration_secs: read_secs(item, TAG_DURATION_SECONDS),
            base_duration_secs: read_secs(item, TAG_BASE_DURATION_SECONDS),
        });
    }

    if !item.material.is_consumable() {
        return None;
    }
    let base = item.meta.base_potion.as_deref()?;
    Some(EncodedItemState {
        effect: EffectKind::from_base_potion(base),
        ..EncodedItemState::default()
    })
}

pub fn is_master_item(item: &ItemStack) -> bool {
    item.tag_flag(TAG_MASTER)
}

fn read_level(item: &ItemStack, key: &str) -> u32 {
    item.tag_int(key)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

fn read_secs(item: &ItemStack, key: &str) -> Option<u64> {
    item.tag_int(key)
        .filter(|v| *v > 0)
        .and_then(|v| u64::try_from(v).ok())
}

/// Natural length of an un-upgraded consumable, in seconds.
///
/// An explicit host duration wins; otherwise the base type decides:
/// `long_` → 480s, instant effects → 1s, anything else → 180s.
pub fn extract_base_duration(item: &ItemStack, effect: EffectKind) -> u64 {
    if let Some(ticks) = item.meta.custom_duration_ticks {
        return (u64::from(ticks) / TICKS_PER_SECOND).max(1);
    }

    let is_long = item
        .meta
        .base_potion
        .as_deref()
        .map(|base| {
            let base = base.trim().to_ascii_lowercase();
            let base = base.strip_prefix("minecraft:").unwrap_or(base.as_str());
            base.starts_with("long_")
        })
        .unwrap_or(false);

    if is_long {
        LONG_DURATION_SECS
    } else {
        default_duration(effect)
    }
}

/// Length used when nothing more specific is known
pub fn default_duration(effect: EffectKind) -> u64 {
    if effect.is_instant() {
        INSTANT_DURATION_SECS
    } else {
        DEFAULT_DURATION_SECS
    }
}

/// Write `state` onto `item`, replacing any previous engine state.
///
/// Host-native effect text is always hidden and the display name/lore are
/// regenerated from the state, so encoding the same state twice produces
/// identical metadata.
pub fn encode(item: &mut ItemStack, state: &EncodedItemState) {
    let tags = &mut item.meta.tags;
    tags.retain(|key, _| !STATE_TAGS.contains(&key.as_str()));

    if state.is_master {
        tags.insert(TAG_MASTER.to_string(), TagValue::Flag(true));
    }
    if let Some(effect) = state.effect {
        tags.insert(TAG_EFFECT.to_string(), TagValue::Text(effect.id().to_string()));
    }
    tags.insert(
        TAG_DURATION_LEVEL.to_string(),
        TagValue::Int(i64::from(state.duration_level)),
    );
    tags.insert(
        TAG_POWER_LEVEL.to_string(),
        TagValue::Int(i64::from(state.power_level)),
    );
    if let Some(secs) = state.duration_secs {
        tags.insert(TAG_DURATION_SECONDS.to_string(), TagValue::Int(clamp_secs(secs)));
    }
    if let Some(secs) = state.base_duration_secs {
        tags.insert(
            TAG_BASE_DURATION_SECONDS.to_string(),
            TagValue::Int(clamp_secs(secs)),
        );
    }

    let (name, lore) = render_display(state);
    item.meta.hide_host_effect_text = true;
    item.meta.display_name = Some(name);
    item.meta.lore = lore;
}

fn clamp_secs(secs: u64) -> i64 {
    i64::try_from(secs).unwrap_or(i64::MAX)
}

/// Display name and lore for an upgraded item
pub fn render_display(state: &EncodedItemState) -> (String, Vec<String>) {
    let name = match state.effect {
        Some(effect) => format!(
            "Master Potion of {} {}",
            effect.display_name(),
            format_amplifier(state.power_level)
        ),
        None => "Master Potion".to_string(),
    };

    let mut lore = Vec::with_capacity(3);
    if let Some(secs) = state.duration_secs {
        lore.push(format!("Duration: {}", format_remaining(secs)));
    }
    lore.push(format!("Duration Tier: {}", tier_label(state.duration_level)));
    lore.push(format!("Power Tier: {}", tier_label(state.power_level)));
    (name, lore)
}

fn tier_label(level: u32) -> String {
    if level == 0 {
        "Base".to_string()
    } else {
        to_roman(level)
    }
}
