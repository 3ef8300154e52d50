//! Upgrade state machine
//!
//! Turns a brewing completion at a master stand into tier upgrades. The
//! host fires its completion signal before it has finished writing the
//! station, so the engine snapshots the pre-completion contents, suppresses
//! the host result and queues a [`PendingBrew`] stamped with the engine tick.
//! A brew is only drained by a later tick, after the host has settled, and
//! the result is computed from the snapshot alone.

use std::collections::VecDeque;

use crate::effects::EffectKind;
use crate::host::BlockPos;
use crate::item::{ItemStack, Material};

use super::codec::{self, DEFAULT_DURATION_SECS, EncodedItemState};
use super::tiers::{Axis, TierTable};

impl Axis {
    /// Axis funded by a catalyst material, if it is one
    pub fn from_catalyst(material: &Material) -> Option<Self> {
        match material {
            Material::Redstone => Some(Self::Duration),
            Material::Glowstone => Some(Self::Power),
            _ => None,
        }
    }
}

/// What happened to one consumable slot during a pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SlotOutcome {
    #[default]
    Empty,
    /// Not a consumable, or no effect could be derived
    NoEffect,
    TierExhausted { level: u32, max: u32 },
    MissingTier { level: u32 },
    InsufficientCatalyst { required: u32, available: u32 },
    Upgraded { axis: Axis, level: u32, cost: u32 },
}

/// Station contents after an upgrade pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrewResult {
    pub axis: Axis,
    pub slots: [Option<ItemStack>; 3],
    /// Remaining catalyst, `None` once fully spent
    pub catalyst: Option<ItemStack>,
    pub outcomes: [SlotOutcome; 3],
}

impl BrewResult {
    pub fn upgraded_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, SlotOutcome::Upgraded { .. }))
            .count()
    }
}

/// Run one upgrade pass over a station snapshot.
///
/// Returns `None` when the catalyst is not one of the two recognized
/// materials. Slots are processed in order against a single shared
/// catalyst stack; a slot is either fully paid for or left untouched.
pub fn upgrade_slots(
    tiers: &TierTable,
    slots: [Option<ItemStack>; 3],
    catalyst: ItemStack,
) -> Option<BrewResult> {
    let axis = Axis::from_catalyst(&catalyst.material)?;
    let mut available = catalyst.amount;
    let mut slots = slots;
    let mut outcomes: [SlotOutcome; 3] = Default::default();

    for (slot, outcome) in slots.iter_mut().zip(outcomes.iter_mut()) {
        *outcome = match slot {
            Some(item) => upgrade_item(tiers, item, axis, &mut available),
            None => SlotOutcome::Empty,
        };
    }

    let catalyst = (available > 0).then(|| ItemStack {
        amount: available,
        ..catalyst
    });

    Some(BrewResult {
        axis,
        slots,
        catalyst,
        outcomes,
    })
}

/// Advance a single item one level on `axis`, debiting `available`.
///
/// The item is only rewritten on success.
pub fn upgrade_item(
    tiers: &TierTable,
    item: &mut ItemStack,
    axis: Axis,
    available: &mut u32,
) -> SlotOutcome {
    let Some(mut state) = codec::decode(item) else {
        return SlotOutcome::NoEffect;
    };
    let Some(effect) = state.effect else {
        return SlotOutcome::NoEffect;
    };

    let current = match axis {
        Axis::Duration => state.duration_level,
        Axis::Power => state.power_level,
    };
    let next = current.saturating_add(1);
    let max = tiers.max_level(axis);
    if next > max {
        return SlotOutcome::TierExhausted { level: next, max };
    }

    let Some(cost) = tiers.cost(axis, next) else {
        return SlotOutcome::MissingTier { level: next };
    };
    if *available < cost {
        return SlotOutcome::InsufficientCatalyst {
            required: cost,
            available: *available,
        };
    }

    match axis {
        Axis::Duration => {
            // cost lookup above guarantees the entry exists
            let Some(tier) = tiers.duration_tier(next) else {
                return SlotOutcome::MissingTier { level: next };
            };
            if state.duration_secs.is_none() && state.base_duration_secs.is_none() {
                state.base_duration_secs = Some(codec::extract_base_duration(item, effect));
            }
            state.duration_level = next;
            state.duration_secs = Some(tier.duration_secs);
        }
        Axis::Power => {
            state.power_level = next;
            let resolved = resolve_duration(tiers, item, &state, effect);
            if state.base_duration_secs.is_none() && state.duration_level == 0 {
                state.base_duration_secs = Some(resolved);
            }
            state.duration_secs = Some(resolved);
        }
    }

    *available -= cost;
    state.is_master = true;
    codec::encode(item, &state);

    tracing::debug!(%effect, %axis, level = next, cost, "Upgraded consumable");
    SlotOutcome::Upgraded {
        axis,
        level: next,
        cost,
    }
}

/// Effect length after a power upgrade
fn resolve_duration(
    tiers: &TierTable,
    item: &ItemStack,
    state: &EncodedItemState,
    effect: EffectKind,
) -> u64 {
    if state.duration_level > 0 {
        if let Some(tier) = tiers.duration_tier(state.duration_level) {
            return tier.duration_secs;
        }
        // tier removed by a reload; keep what the item already had
        if let Some(secs) = state.duration_secs {
            return secs;
        }
    }
    if let Some(base) = state.base_duration_secs {
        return base;
    }
    match effect {
        EffectKind::Flight => DEFAULT_DURATION_SECS,
        EffectKind::Standard(_) => codec::extract_base_duration(item, effect),
    }
}

/// A brewing completion waiting for the host to settle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingBrew {
    pub station: BlockPos,
    /// Pre-completion snapshot of the consumable slots
    pub slots: [Option<ItemStack>; 3],
    pub catalyst: ItemStack,
    /// Engine tick count when the completion was seen
    pub queued_tick: u64,
}

/// Continuations queued by brewing signals, drained once per tick
#[derive(Debug, Default)]
pub struct BrewQueue {
    pending: VecDeque<PendingBrew>,
}

impl BrewQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, brew: PendingBrew) {
        self.pending.push_back(brew);
    }

    /// Take every brew queued before `tick`. Anything queued during `tick`
    /// itself stays for a later drain.
    pub fn drain_before(&mut self, tick: u64) -> Vec<PendingBrew> {
        let ready = self
            .pending
            .iter()
            .take_while(|brew| brew.queued_tick < tick)
            .count();
        self.pending.drain(..ready).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
