//! Engine configuration
//!
//! Persisted as TOML. Every field has a default so a partial (or missing)
//! file still yields a usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
///
/// Tier ladders are kept in their line grammar (`level,cost,seconds` for the
/// duration axis, `level,cost` for the power axis) so that a single malformed
/// entry can be skipped without rejecting the whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Duration-axis tier lines: `level,catalystCost,durationSeconds`
    pub duration_tiers: Vec<String>,

    /// Power-axis tier lines: `level,catalystCost`
    pub power_tiers: Vec<String>,

    /// Directory for the stand file and per-actor effect files.
    /// Falls back to the platform data directory when unset.
    pub data_dir: Option<PathBuf>,

    /// Host ticks between reconciliation passes (20 ticks ≈ 1s)
    pub reconcile_period_ticks: u32,

    /// Remaining-time marks (in seconds) at which an expiry warning fires
    pub warning_thresholds_secs: Vec<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duration_tiers: vec![
                "1,4,300".to_string(),
                "2,8,480".to_string(),
                "3,16,960".to_string(),
            ],
            power_tiers: vec!["1,4".to_string(), "2,8".to_string(), "3,16".to_string()],
            data_dir: None,
            reconcile_period_ticks: 20,
            warning_thresholds_secs: vec![30, 10],
        }
    }
}
