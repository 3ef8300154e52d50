//! Shared configuration and display types for brewmaster.

pub mod config;
pub mod formatting;

pub use config::EngineConfig;
