//! Effect identifiers
//!
//! Item tags, effect files and commands all carry effects as strings. They
//! are resolved once into an [`EffectKind`] so downstream code matches on a
//! variant instead of comparing against the `"fly"` sentinel.

use std::fmt;

use brewmaster_types::formatting::title_case;

/// Sentinel identifier of the synthetic flight effect
pub const FLIGHT_ID: &str = "fly";

/// Host timed effects the engine can grant
static SUPPORTED_EFFECTS: phf::Set<&'static str> = phf::phf_set! {
    "speed",
    "slowness",
    "haste",
    "mining_fatigue",
    "strength",
    "instant_health",
    "instant_damage",
    "jump_boost",
    "nausea",
    "regeneration",
    "resistance",
    "fire_resistance",
    "water_breathing",
    "invisibility",
    "blindness",
    "night_vision",
    "hunger",
    "weakness",
    "poison",
    "wither",
    "health_boost",
    "absorption",
    "saturation",
    "glowing",
    "levitation",
    "luck",
    "unluck",
    "slow_falling",
    "conduit_power",
    "dolphins_grace",
};

/// Potion type names that differ from the effect they grant
static EFFECT_SYNONYMS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "leaping" => "jump_boost",
    "swiftness" => "speed",
    "healing" => "instant_health",
    "harming" => "instant_damage",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    /// A host timed effect, by canonical name
    Standard(&'static str),
    /// Flight capability plus fly-speed multiplier; no host effect type
    Flight,
}

impl EffectKind {
    /// Resolve an identifier from tags, files or commands.
    ///
    /// Case-insensitive; tolerates a `minecraft:` prefix and potion-type
    /// synonyms. Returns `None` for anything outside the supported set.
    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        let name = lowered.strip_prefix("minecraft:").unwrap_or(lowered.as_str());
        if name == FLIGHT_ID {
            return Some(Self::Flight);
        }
        let name = EFFECT_SYNONYMS.get(name).copied().unwrap_or(name);
        SUPPORTED_EFFECTS.get_key(name).map(|key| Self::Standard(*key))
    }

    /// Derive the effect of an un-upgraded potion from its base type,
    /// stripping the `long_`/`strong_` qualifiers.
    pub fn from_base_potion(base: &str) -> Option<Self> {
        let lowered = base.trim().to_ascii_lowercase();
        let name = lowered.strip_prefix("minecraft:").unwrap_or(lowered.as_str());
        let name = name
            .strip_prefix("long_")
            .or_else(|| name.strip_prefix("strong_"))
            .unwrap_or(name);
        match Self::parse(name)? {
            Self::Flight => None,
            kind => Some(kind),
        }
    }

    /// Every grantable effect, flight included, in a stable order
    pub fn all() -> Vec<Self> {
        let mut kinds: Vec<Self> = SUPPORTED_EFFECTS.iter().map(|id| Self::Standard(*id)).collect();
        kinds.sort();
        kinds.push(Self::Flight);
        kinds
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Standard(id) => *id,
            Self::Flight => FLIGHT_ID,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Self::Standard(id) => title_case(id),
            Self::Flight => "Flight".to_string(),
        }
    }

    pub fn is_instant(&self) -> bool {
        matches!(self, Self::Standard(id) if id.starts_with("instant_"))
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_standard_and_flight() {
        assert_eq!(EffectKind::parse("speed"), Some(EffectKind::Standard("speed")));
        assert_eq!(EffectKind::parse(" SPEED "), Some(EffectKind::Standard("speed")));
        assert_eq!(
            EffectKind::parse("minecraft:night_vision"),
            Some(EffectKind::Standard("night_vision"))
        );
        assert_eq!(EffectKind::parse("fly"), Some(EffectKind::Flight));
        assert_eq!(EffectKind::parse("teleport"), None);
        assert_eq!(EffectKind::parse(""), None);
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(EffectKind::parse("leaping"), Some(EffectKind::Standard("jump_boost")));
        assert_eq!(EffectKind::parse("swiftness"), Some(EffectKind::Standard("speed")));
        assert_eq!(EffectKind::parse("healing"), Some(EffectKind::Standard("instant_health")));
        assert_eq!(EffectKind::parse("harming"), Some(EffectKind::Standard("instant_damage")));
    }

    #[test]
    fn test_from_base_potion_strips_qualifiers() {
        assert_eq!(
            EffectKind::from_base_potion("long_swiftness"),
            Some(EffectKind::Standard("speed"))
        );
        assert_eq!(
            EffectKind::from_base_potion("strong_leaping"),
            Some(EffectKind::Standard("jump_boost"))
        );
        assert_eq!(
            EffectKind::from_base_potion("fire_resistance"),
            Some(EffectKind::Standard("fire_resistance"))
        );
        assert_eq!(EffectKind::from_base_potion("water"), None);
        assert_eq!(EffectKind::from_base_potion("awkward"), None);
        assert_eq!(EffectKind::from_base_potion("fly"), None);
    }

    #[test]
    fn test_all_contains_flight_once() {
        let all = EffectKind::all();
        assert_eq!(all.iter().filter(|k| **k == EffectKind::Flight).count(), 1);
        assert!(all.contains(&EffectKind::Standard("speed")));
        assert_eq!(all.len(), SUPPORTED_EFFECTS.len() + 1);
    }

    #[test]
    fn test_display_and_instant() {
        assert_eq!(EffectKind::Standard("jump_boost").display_name(), "Jump Boost");
        assert_eq!(EffectKind::Flight.display_name(), "Flight");
        assert_eq!(EffectKind::Flight.to_string(), "fly");
        assert!(EffectKind::Standard("instant_health").is_instant());
        assert!(!EffectKind::Standard("speed").is_instant());
        assert!(!EffectKind::Flight.is_instant());
    }
}
