//! Active effect system
//!
//! This module provides:
//! - **Kinds**: resolved effect identifiers, including synthetic flight
//! - **Records**: the per-actor registry of granted effects (source of truth)
//! - **Activation**: applying an upgraded item to an actor
//! - **Reconciler**: periodic self-healing of live host state
//! - **Store**: per-actor flat-file persistence across reconnects
//!
//! # Lifecycle
//!
//! ```text
//!           item used                       actor connects
//!               │                                 │
//!               ▼                                 ▼
//!  ┌─────────────────────────┐        ┌───────────────────────┐
//!  │ activate()              │        │ EffectStore::load()   │
//!  │ grant + replace record  │        └───────────┬───────────┘
//!  └────────────┬────────────┘                    │
//!               ▼                                 ▼
//!  ┌─────────────────────────────────────────────────────────┐
//!  │ EffectRegistry   actor → [ActiveEffectRecord]           │
//!  └─────────────────────────────────────────────────────────┘
//!               │ every reconcile period          │ disconnect / shutdown
//!               ▼                                 ▼
//!  ┌─────────────────────────┐        ┌───────────────────────┐
//!  │ Reconciler::run()       │        │ EffectStore::save()   │
//!  │ re-grant, expire, warn  │        └───────────────────────┘
//!  └─────────────────────────┘
//! ```

pub mod activation;
mod kind;
mod record;
pub mod reconciler;
mod store;


pub use activation::{DEFAULT_FLY_SPEED, activate, flight_speed};
pub use kind::{EffectKind, FLIGHT_ID};
pub use reconciler::{ReconcileSummary, Reconciler};
pub use record::{ActiveEffectRecord, EffectRegistry, RecordParseError};
pub use store::EffectStore;
