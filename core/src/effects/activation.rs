//! Turning an upgraded item into a running effect

use brewmaster_types::formatting::format_amplifier;

use crate::brewing::EncodedItemState;
use crate::error::ActivationError;
use crate::host::{ActorId, EffectGrant, Hand, Host, Notice, TICKS_PER_SECOND};

use super::{ActiveEffectRecord, EffectKind, EffectRegistry};

/// Host default fly speed
pub const DEFAULT_FLY_SPEED: f32 = 0.1;

/// Each flight power level adds 20% to the base speed
const FLY_SPEED_STEP: f32 = 0.2;

/// Host fly-speed multiplier for a flight amplifier, capped at the host maximum of 1.0
pub fn flight_speed(amplifier: u32) -> f32 {
    (DEFAULT_FLY_SPEED * (1.0 + FLY_SPEED_STEP * amplifier as f32)).min(1.0)
}

/// Apply an upgraded item's effect to `actor` and consume one unit from `hand`.
///
/// The registry entry for the same effect is replaced, never stacked. On
/// error nothing is granted and the item is left in the hand.
pub fn activate(
    registry: &mut EffectRegistry,
    host: &mut dyn Host,
    actor: &ActorId,
    hand: Hand,
    state: &EncodedItemState,
    now_ms: i64,
) -> Result<ActiveEffectRecord, ActivationError> {
    let effect = state.effect.ok_or(ActivationError::MissingEffect)?;
    let duration_secs = state
        .duration_secs
        .filter(|secs| *secs > 0)
        .ok_or(ActivationError::MissingDuration)?;
    let amplifier = state.power_level;

    let duration_ms = i64::try_from(duration_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
    let record = ActiveEffectRecord::new(effect, amplifier, now_ms.saturating_add(duration_ms));

    match effect {
        EffectKind::Flight => {
            if !host.game_mode(actor).grants_flight() {
                host.set_allow_flight(actor, true);
            }
            host.set_fly_speed(actor, flight_speed(amplifier));
        }
        EffectKind::Standard(id) => {
            let ticks = duration_secs.saturating_mul(TICKS_PER_SECOND);
            let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
            host.grant_effect(actor, EffectGrant::ambient(id, amplifier, ticks));
        }
    }

    if let Some(previous) = registry.activate(actor, record.clone()) {
        tracing::debug!(
            actor = %actor,
            effect = %effect,
            previous_amplifier = previous.amplifier,
            "Refreshed active effect"
        );
    }

    host.take_from_hand(actor, hand, 1);
    host.notify(
        actor,
        Notice::Activated {
            effect,
            amplifier,
            duration_secs,
        },
    );

    tracing::info!(
        actor = %actor,
        effect = %effect,
        level = %format_amplifier(amplifier),
        duration_secs,
        "Activated master potion"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::GameMode;
    use crate::testing::FakeHost;

    const NOW: i64 = 1_000_000;

    #[test]
    fn test_flight_speed_scales_and_caps() {
        assert!((flight_speed(0) - 0.1).abs() < f32::EPSILON);
        assert!((flight_speed(1) - 0.12).abs() < 1e-6);
        assert!((flight_speed(5) - 0.2).abs() < 1e-6);
        assert!((flight_speed(100) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_activate_standard_effect() {
        let mut host = FakeHost::new(NOW);
        let actor = host.connect("steve");
        let mut registry = EffectRegistry::new();
        let state = EncodedItemState::master(EffectKind::Standard("speed"), 2, 1, 120);

        let record = activate(&mut registry, &mut host, &actor, Hand::Main, &state, NOW).unwrap();

        assert_eq!(record.expires_at_ms, NOW + 120_000);
        assert_eq!(registry.records(&actor), &[record]);
        let granted = host.actor(&actor).grants.last().copied().unwrap();
        assert_eq!(granted, EffectGrant::ambient("speed", 1, 2400));
        assert!(!granted.particles);
        assert_eq!(host.actor(&actor).taken, 1);
        assert!(matches!(
            host.actor(&actor).notices.last(),
            Some(Notice::Activated { duration_secs: 120, .. })
        ));
    }

    #[test]
    fn test_activate_flight_survival_enables_flight() {
        let mut host = FakeHost::new(NOW);
        let actor = host.connect("steve");
        let mut registry = EffectRegistry::new();
        let state = EncodedItemState::master(EffectKind::Flight, 0, 1, 300);

        activate(&mut registry, &mut host, &actor, Hand::Off, &state, NOW).unwrap();

        let fake = host.actor(&actor);
        assert!(fake.allow_flight);
        assert!((fake.fly_speed - 0.12).abs() < 1e-6);
        assert!(fake.grants.is_empty());
    }

    #[test]
    fn test_activate_flight_creative_leaves_allow_flight() {
        let mut host = FakeHost::new(NOW);
        let actor = host.connect("builder");
        host.actor_mut(&actor).game_mode = GameMode::Creative;
        let mut registry = EffectRegistry::new();
        let state = EncodedItemState::master(EffectKind::Flight, 0, 0, 60);

        activate(&mut registry, &mut host, &actor, Hand::Main, &state, NOW).unwrap();
        assert_eq!(host.actor(&actor).allow_flight_writes, 0);
    }

    #[test]
    fn test_activate_rejects_incomplete_state() {
        let mut host = FakeHost::new(NOW);
        let actor = host.connect("steve");
        let mut registry = EffectRegistry::new();

        let mut state = EncodedItemState::master(EffectKind::Standard("speed"), 1, 0, 60);
        state.effect = None;
        assert_eq!(
            activate(&mut registry, &mut host, &actor, Hand::Main, &state, NOW),
            Err(ActivationError::MissingEffect)
        );

        let mut state = EncodedItemState::master(EffectKind::Standard("speed"), 1, 0, 60);
        state.duration_secs = None;
        assert_eq!(
            activate(&mut registry, &mut host, &actor, Hand::Main, &state, NOW),
            Err(ActivationError::MissingDuration)
        );

        assert!(registry.is_empty());
        assert_eq!(host.actor(&actor).taken, 0);
        assert!(host.actor(&actor).grants.is_empty());
    }

    #[test]
    fn test_reactivation_replaces_record() {
        let mut host = FakeHost::new(NOW);
        let actor = host.connect("steve");
        let mut registry = EffectRegistry::new();

        let first = EncodedItemState::master(EffectKind::Standard("haste"), 3, 2, 600);
        let second = EncodedItemState::master(EffectKind::Standard("haste"), 1, 0, 60);
        activate(&mut registry, &mut host, &actor, Hand::Main, &first, NOW).unwrap();
        activate(&mut registry, &mut host, &actor, Hand::Main, &second, NOW + 5).unwrap();

        let records = registry.records(&actor);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].amplifier, 0);
        assert_eq!(records[0].expires_at_ms, NOW + 5 + 60_000);
    }
}
