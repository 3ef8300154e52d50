//! Brewing upgrades
//!
//! ```text
//!   TierTable ──► upgrade_slots ──► codec::encode ──► item at rest
//!                     ▲
//!        PendingBrew (snapshot taken at completion, run next tick)
//! ```

pub mod codec;
pub mod tiers;
pub mod upgrade;

pub use codec::{EncodedItemState, decode, encode, extract_base_duration};
pub use tiers::{Axis, DurationTier, PowerTier, SkippedLine, TierParseError, TierTable};
pub use upgrade::{BrewQueue, BrewResult, PendingBrew, SlotOutcome, upgrade_item, upgrade_slots};
