pub mod brewing;
pub mod commands;
pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod host;
pub mod item;
pub mod stands;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use brewing::{Axis, EncodedItemState, TierTable};
pub use commands::ReloadReport;
pub use effects::{ActiveEffectRecord, EffectKind, EffectRegistry};
pub use engine::{Engine, HostSignal, SignalOutcome};
pub use error::{ActivationError, CommandError, ConfigError, StoreError};
pub use host::{ActorId, BlockPos, GameMode, Hand, Host, Notice};
pub use item::{ItemStack, Material};
