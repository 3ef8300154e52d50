//! Error types shared across the engine
//!
//! None of these ever reach the host: signal handlers log them at `warn`
//! and degrade to "did not apply". Only the command surface returns them to
//! an interactive caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::brewing::Axis;
use crate::host::ActorId;

/// Errors that can occur while loading engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config {path:?}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: confy::ConfyError,
    },

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors from the flat-file stores (stand file, per-actor effect files)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rejections surfaced to an interactive command caller
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("actor {0} is not connected")]
    ActorOffline(ActorId),

    #[error("unknown effect `{0}`")]
    UnknownEffect(String),

    #[error("{axis} level {level} is out of range (0..={max})")]
    LevelOutOfRange { axis: Axis, level: u32, max: u32 },

    #[error("no {axis} tier is configured for level {level}")]
    MissingTier { axis: Axis, level: u32 },

    #[error("engine was not loaded from a config file, nothing to reload")]
    NoConfigFile,

    #[error("tier reload failed: {0}")]
    Reload(#[from] ConfigError),
}

/// An upgraded item that cannot be activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("item has no effect identifier")]
    MissingEffect,

    #[error("item has no resolved duration")]
    MissingDuration,
}
