//! Periodic reconciliation of live effects against the registry
//!
//! Each pass walks every connected actor that has records and drives the
//! host back toward what the registry says:
//!
//! ```text
//!   record expired ──────────────► retire, revoke flight, notify
//!   record live, flight ─────────► reapply speed, re-enable flight, status line
//!   record live, host missing ───► re-grant at remaining duration
//!   record live, wrong amplifier ► remove + re-grant
//! ```
//!
//! The registry always wins. Whatever removed or altered a live effect, it
//! is restored within one pass.

use brewmaster_types::formatting::{format_amplifier, format_remaining_millis};
use hashbrown::HashMap;

use crate::host::{ActorId, EffectGrant, Host, Notice};

use super::activation::{DEFAULT_FLY_SPEED, flight_speed};
use super::{ActiveEffectRecord, EffectKind, EffectRegistry};

/// Host effect ticks per millisecond of remaining time
const MILLIS_PER_TICK: i64 = 50;

/// Counts from one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub actors: usize,
    pub expired: usize,
    pub regranted: usize,
    pub corrected: usize,
    pub warnings: usize,
}

#[derive(Debug)]
pub struct Reconciler {
    /// Remaining-seconds marks that produce an expiry warning
    thresholds: Vec<u64>,
    /// Last whole second observed per (actor, effect), for threshold crossing
    last_seen_secs: HashMap<(ActorId, EffectKind), u64>,
}

impl Reconciler {
    pub fn new(thresholds: &[u64]) -> Self {
        let mut thresholds = thresholds.to_vec();
        thresholds.sort_unstable_by(|a, b| b.cmp(a));
        thresholds.dedup();
        Self {
            thresholds,
            last_seen_secs: HashMap::new(),
        }
    }

    /// Run one pass over every connected actor with records
    pub fn run(
        &mut self,
        registry: &mut EffectRegistry,
        host: &mut dyn Host,
        now_ms: i64,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();

        let actors: Vec<ActorId> = registry
            .actors()
            .filter(|actor| host.is_connected(actor))
            .cloned()
            .collect();

        for actor in &actors {
            summary.actors += 1;
            let records = registry.records(actor).to_vec();
            let mut survivors = Vec::with_capacity(records.len());

            for record in records {
                if record.is_expired(now_ms) {
                    self.retire(host, actor, &record);
                    summary.expired += 1;
                    continue;
                }

                if self.check_threshold(host, actor, &record, now_ms) {
                    summary.warnings += 1;
                }

                match record.effect {
                    EffectKind::Flight => maintain_flight(host, actor, &record, now_ms),
                    EffectKind::Standard(id) => {
                        match heal_standard(host, actor, id, &record, now_ms) {
                            Healing::InSync => {}
                            Healing::Regranted => summary.regranted += 1,
                            Healing::Corrected => summary.corrected += 1,
                        }
                    }
                }
                survivors.push(record);
            }

            registry.replace(actor, survivors);
        }

        // Forget crossing marks for records that no longer exist
        self.last_seen_secs
            .retain(|(actor, effect), _| registry.get(actor, *effect).is_some());

        if summary.expired + summary.regranted + summary.corrected > 0 {
            tracing::debug!(
                actors = summary.actors,
                expired = summary.expired,
                regranted = summary.regranted,
                corrected = summary.corrected,
                "Reconciled active effects"
            );
        }
        summary
    }

    fn retire(&mut self, host: &mut dyn Host, actor: &ActorId, record: &ActiveEffectRecord) {
        if record.effect == EffectKind::Flight && !host.game_mode(actor).grants_flight() {
            host.set_flying(actor, false);
            host.set_allow_flight(actor, false);
            host.set_fly_speed(actor, DEFAULT_FLY_SPEED);
        }
        self.last_seen_secs.remove(&(actor.clone(), record.effect));
        host.notify(
            actor,
            Notice::Expired {
                effect: record.effect,
            },
        );
        tracing::info!(actor = %actor, effect = %record.effect, "Effect expired");
    }

    /// Emit a warning when remaining time reaches a threshold second.
    ///
    /// Passes are about one second apart, but a late pass may jump over the
    /// exact second; any threshold between the previous and current
    /// observation counts as crossed. Fires at most once per crossing.
    fn check_threshold(
        &mut self,
        host: &mut dyn Host,
        actor: &ActorId,
        record: &ActiveEffectRecord,
        now_ms: i64,
    ) -> bool {
        let remaining_secs = u64::try_from(record.remaining_ms(now_ms) / 1000).unwrap_or(0);
        let previous = self
            .last_seen_secs
            .insert((actor.clone(), record.effect), remaining_secs);

        let crossed = self.thresholds.iter().any(|&t| match previous {
            Some(prev) => remaining_secs <= t && t < prev,
            None => remaining_secs == t,
        });
        if !crossed {
            return false;
        }

        host.notify(
            actor,
            Notice::ExpiringSoon {
                effect: record.effect,
                remaining_secs: remaining_secs.max(1),
            },
        );
        true
    }
}

fn maintain_flight(host: &mut dyn Host, actor: &ActorId, record: &ActiveEffectRecord, now_ms: i64) {
    host.set_fly_speed(actor, flight_speed(record.amplifier));
    if !host.allow_flight(actor) {
        tracing::debug!(actor = %actor, "Restoring flight capability");
        host.set_allow_flight(actor, true);
    }

    let status = format!(
        "{} {} - {}",
        record.effect.display_name(),
        format_amplifier(record.amplifier),
        format_remaining_millis(record.remaining_ms(now_ms))
    );
    host.show_status(actor, &status);
}

enum Healing {
    InSync,
    Regranted,
    Corrected,
}

fn heal_standard(
    host: &mut dyn Host,
    actor: &ActorId,
    id: &'static str,
    record: &ActiveEffectRecord,
    now_ms: i64,
) -> Healing {
    let ticks = remaining_ticks(record, now_ms);
    match host.live_effect(actor, id) {
        Some(live) if live.amplifier == record.amplifier => Healing::InSync,
        Some(live) => {
            tracing::debug!(
                actor = %actor,
                effect = id,
                live_amplifier = live.amplifier,
                recorded_amplifier = record.amplifier,
                "Correcting effect amplifier"
            );
            host.remove_effect(actor, id);
            host.grant_effect(actor, EffectGrant::ambient(id, record.amplifier, ticks));
            Healing::Corrected
        }
        // instant effects apply once on activation and never show as live
        None if record.effect.is_instant() => Healing::InSync,
        None => {
            tracing::debug!(actor = %actor, effect = id, ticks, "Re-granting missing effect");
            host.grant_effect(actor, EffectGrant::ambient(id, record.amplifier, ticks));
            Healing::Regranted
        }
    }
}

fn remaining_ticks(record: &ActiveEffectRecord, now_ms: i64) -> u32 {
    let ticks = (record.remaining_ms(now_ms) / MILLIS_PER_TICK).max(1);
    u32::try_from(ticks).unwrap_or(u32::MAX)
}
