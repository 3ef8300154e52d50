//! Operator commands
//!
//! Plain functions over the engine for an outer command layer to call.
//! Every rejection is a [`CommandError`] with a message fit for the caller.

use std::path::PathBuf;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::brewing::codec::default_duration;
use crate::brewing::{self, Axis, EncodedItemState, SkippedLine, TierTable};
use crate::config;
use crate::effects::EffectKind;
use crate::engine::Engine;
use crate::error::CommandError;
use crate::host::{ActorId, Host};
use crate::item::ItemStack;
use crate::stands;

/// Result of a tier reload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadReport {
    pub path: PathBuf,
    pub duration_tiers: usize,
    pub power_tiers: usize,
    pub skipped: Vec<SkippedLine>,
}

impl Engine {
    /// Give `target` a master brewing stand item
    pub fn grant_stand(&self, host: &mut dyn Host, target: &ActorId) -> Result<(), CommandError> {
        ensure_connected(host, target)?;
        host.give_item(target, stands::stand_item());
        tracing::info!(actor = %target, "Granted master stand");
        Ok(())
    }

    /// Give `target` a master potion at the requested levels.
    ///
    /// Level 0 on an axis means "not upgraded on that axis".
    pub fn grant_potion(
        &self,
        host: &mut dyn Host,
        target: &ActorId,
        effect: &str,
        duration_level: u32,
        power_level: u32,
    ) -> Result<ItemStack, CommandError> {
        ensure_connected(host, target)?;
        let effect =
            EffectKind::parse(effect).ok_or_else(|| CommandError::UnknownEffect(effect.to_string()))?;

        let tiers = self.tiers();
        check_level(&tiers, Axis::Duration, duration_level)?;
        check_level(&tiers, Axis::Power, power_level)?;

        let item = master_potion(&tiers, effect, duration_level, power_level)?;
        host.give_item(target, item.clone());
        tracing::info!(
            actor = %target,
            effect = %effect,
            duration_level,
            power_level,
            "Granted master potion"
        );
        Ok(item)
    }

    /// [`grant_potion`](Self::grant_potion) at the highest configured levels
    pub fn grant_max_potion(
        &self,
        host: &mut dyn Host,
        target: &ActorId,
        effect: &str,
    ) -> Result<ItemStack, CommandError> {
        let tiers = self.tiers();
        self.grant_potion(
            host,
            target,
            effect,
            tiers.max_duration_level(),
            tiers.max_power_level(),
        )
    }

    pub fn grant_random_potion(
        &self,
        host: &mut dyn Host,
        target: &ActorId,
    ) -> Result<ItemStack, CommandError> {
        self.grant_random_potion_with(host, target, &mut rand::thread_rng())
    }

    /// Random effect (flight included) with a random defined level per axis.
    ///
    /// Levels are drawn only from entries that exist, so sparse ladders never
    /// produce an unbuildable potion. An empty ladder yields level 0.
    pub fn grant_random_potion_with<R: Rng + ?Sized>(
        &self,
        host: &mut dyn Host,
        target: &ActorId,
        rng: &mut R,
    ) -> Result<ItemStack, CommandError> {
        let kinds = EffectKind::all();
        let Some(effect) = kinds.choose(rng).copied() else {
            return Err(CommandError::UnknownEffect(String::new()));
        };

        let tiers = self.tiers();
        let duration_level = tiers.levels(Axis::Duration).choose(rng).copied().unwrap_or(0);
        let power_level = tiers.levels(Axis::Power).choose(rng).copied().unwrap_or(0);
        self.grant_potion(host, target, effect.id(), duration_level, power_level)
    }

    /// Re-read the config file and swap in new tier ladders.
    ///
    /// The file is never created here. On failure the current ladders stay
    /// in place.
    pub fn reload_tier_tables(&mut self) -> Result<ReloadReport, CommandError> {
        let path = self
            .config_path()
            .map(PathBuf::from)
            .ok_or(CommandError::NoConfigFile)?;
        let source = config::read_config(&path)?;
        let tiers = TierTable::parse(&source.duration_tiers, &source.power_tiers);

        let report = ReloadReport {
            path,
            duration_tiers: tiers.duration_tiers().count(),
            power_tiers: tiers.power_tiers().count(),
            skipped: tiers.skipped().to_vec(),
        };
        self.replace_tiers(&source, tiers);

        tracing::info!(
            path = %report.path.display(),
            duration_tiers = report.duration_tiers,
            power_tiers = report.power_tiers,
            skipped = report.skipped.len(),
            "Reloaded tier tables"
        );
        Ok(report)
    }
}

fn ensure_connected(host: &dyn Host, target: &ActorId) -> Result<(), CommandError> {
    if host.is_connected(target) {
        Ok(())
    } else {
        Err(CommandError::ActorOffline(target.clone()))
    }
}

fn check_level(tiers: &TierTable, axis: Axis, level: u32) -> Result<(), CommandError> {
    let max = tiers.max_level(axis);
    if level > max {
        return Err(CommandError::LevelOutOfRange { axis, level, max });
    }
    if level > 0 && tiers.cost(axis, level).is_none() {
        return Err(CommandError::MissingTier { axis, level });
    }
    Ok(())
}

/// Build an encoded master potion without touching any host state
pub fn master_potion(
    tiers: &TierTable,
    effect: EffectKind,
    duration_level: u32,
    power_level: u32,
) -> Result<ItemStack, CommandError> {
    let base = default_duration(effect);
    let duration_secs = if duration_level == 0 {
        base
    } else {
        tiers
            .duration_tier(duration_level)
            .map(|t| t.duration_secs)
            .ok_or(CommandError::MissingTier {
                axis: Axis::Duration,
                level: duration_level,
            })?
    };

    let base_potion = match effect {
        EffectKind::Standard(id) => id,
        EffectKind::Flight => "awkward",
    };
    let mut item = ItemStack::potion(base_potion);
    let state = EncodedItemState {
        base_duration_secs: Some(base),
        ..EncodedItemState::master(effect, duration_level, power_level, duration_secs)
    };
    brewing::encode(&mut item, &state);
    Ok(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brewing::decode;
    use crate::error::ConfigError;
    use crate::testing::FakeHost;
    use brewmaster_types::EngineConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn engine() -> Engine {
        let config = EngineConfig {
            duration_tiers: vec!["1,2,60".into(), "2,4,120".into()],
            power_tiers: vec!["1,3".into(), "3,9".into()],
            ..EngineConfig::default()
        };
        Engine::from_config(config)
    }

    #[test]
    fn test_grant_potion_encodes_levels() {
        let engine = engine();
        let mut host = FakeHost::new(0);
        let actor = host.connect("steve");

        let item = engine
            .grant_potion(&mut host, &actor, "swiftness", 2, 1)
            .unwrap();
        let state = decode(&item).unwrap();
        assert!(state.is_master);
        assert_eq!(state.effect, Some(EffectKind::Standard("speed")));
        assert_eq!(state.duration_level, 2);
        assert_eq!(state.power_level, 1);
        assert_eq!(state.duration_secs, Some(120));
        assert_eq!(host.actor(&actor).given, vec![item]);
    }

    #[test]
    fn test_grant_potion_level_zero_uses_default_duration() {
        let engine = engine();
        let mut host = FakeHost::new(0);
        let actor = host.connect("steve");

        let fly = engine.grant_potion(&mut host, &actor, "fly", 0, 1).unwrap();
        assert_eq!(decode(&fly).unwrap().duration_secs, Some(180));

        let heal = engine.grant_potion(&mut host, &actor, "instant_health", 0, 0).unwrap();
        assert_eq!(decode(&heal).unwrap().duration_secs, Some(1));
    }

    #[test]
    fn test_grant_potion_rejections() {
        let engine = engine();
        let mut host = FakeHost::new(0);
        let actor = host.connect("steve");

        assert!(matches!(
            engine.grant_potion(&mut host, &actor, "teleport", 1, 1),
            Err(CommandError::UnknownEffect(name)) if name == "teleport"
        ));
        assert!(matches!(
            engine.grant_potion(&mut host, &actor, "speed", 3, 0),
            Err(CommandError::LevelOutOfRange { axis: Axis::Duration, level: 3, max: 2 })
        ));
        assert!(matches!(
            engine.grant_potion(&mut host, &actor, "speed", 0, 4),
            Err(CommandError::LevelOutOfRange { axis: Axis::Power, level: 4, max: 3 })
        ));
        assert!(matches!(
            engine.grant_potion(&mut host, &actor, "speed", 0, 2),
            Err(CommandError::MissingTier { axis: Axis::Power, level: 2 })
        ));

        let offline = ActorId::new("ghost");
        assert!(matches!(
            engine.grant_potion(&mut host, &offline, "speed", 1, 1),
            Err(CommandError::ActorOffline(_))
        ));
        assert!(host.actor(&actor).given.is_empty());
    }

    #[test]
    fn test_grant_max_potion() {
        let engine = engine();
        let mut host = FakeHost::new(0);
        let actor = host.connect("steve");

        let item = engine.grant_max_potion(&mut host, &actor, "haste").unwrap();
        let state = decode(&item).unwrap();
        assert_eq!((state.duration_level, state.power_level), (2, 3));
    }

    #[test]
    fn test_random_potion_uses_defined_levels() {
        let engine = engine();
        let mut host = FakeHost::new(0);
        let actor = host.connect("steve");
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..50 {
            let item = engine
                .grant_random_potion_with(&mut host, &actor, &mut rng)
                .unwrap();
            let state = decode(&item).unwrap();
            assert!(state.effect.is_some());
            assert!([1, 2].contains(&state.duration_level));
            assert!([1, 3].contains(&state.power_level));
        }
    }

    #[test]
    fn test_reload_without_config_file_keeps_tiers() {
        let mut engine = engine();
        let before = engine.tiers();

        assert!(matches!(
            engine.reload_tier_tables(),
            Err(CommandError::NoConfigFile)
        ));
        assert!(Arc::ptr_eq(&engine.tiers(), &before));
    }

    #[test]
    fn test_failed_reload_keeps_tiers_and_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "duration_tiers = [\"1,2,60\", \"2,4,120\"]\npower_tiers = [\"1,3\"]\n",
        )
        .unwrap();
        let mut engine = Engine::from_config_file(&path);
        assert_eq!(engine.tiers().max_duration_level(), 2);
        let before = engine.tiers();

        std::fs::write(&path, "duration_tiers = 5").unwrap();
        assert!(matches!(
            engine.reload_tier_tables(),
            Err(CommandError::Reload(ConfigError::Parse { .. }))
        ));
        assert!(Arc::ptr_eq(&engine.tiers(), &before));

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            engine.reload_tier_tables(),
            Err(CommandError::Reload(ConfigError::Io { .. }))
        ));
        assert!(!path.exists());
        assert!(Arc::ptr_eq(&engine.tiers(), &before));
        assert_eq!(engine.config().duration_tiers, vec!["1,2,60", "2,4,120"]);
    }

    #[test]
    fn test_grant_stand() {
        let engine = engine();
        let mut host = FakeHost::new(0);
        let actor = host.connect("steve");

        engine.grant_stand(&mut host, &actor).unwrap();
        assert!(stands::is_stand_item(&host.actor(&actor).given[0]));
    }
}
