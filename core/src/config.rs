//! Configuration loading
//!
//! `EngineConfig` itself lives in `brewmaster-types`; this module finds the
//! file, loads it and resolves derived paths.

use std::fs;
use std::path::{Path, PathBuf};

use brewmaster_types::EngineConfig;

use crate::error::ConfigError;

const APP_DIR: &str = "brewmaster";

/// `<platform data dir>/brewmaster`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// Directory holding the stand file and effect files
pub fn resolve_data_dir(config: &EngineConfig) -> PathBuf {
    config.data_dir.clone().unwrap_or_else(default_data_dir)
}

/// Load a config file, writing the defaults out if it does not exist yet
pub fn load_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    confy::load_path(path).map_err(|source| ConfigError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// [`load_config`], falling back to defaults on any failure
pub fn load_or_default(path: &Path) -> EngineConfig {
    match load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(error = %e, "Using default engine configuration");
            EngineConfig::default()
        }
    }
}

/// Read a config file without creating it
pub fn read_config(path: &Path) -> Result<EngineConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_config(contents: &str) -> Result<EngineConfig, toml::de::Error> {
    toml::from_str(contents)
}
