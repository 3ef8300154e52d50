//! Tier ladders
//!
//! Two independent ladders map an upgrade level to its catalyst cost (and,
//! for the duration axis, the resulting effect length). A table is built
//! once per load/reload and never mutated afterwards; reload swaps in a new
//! table behind an `Arc`.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Which ladder an upgrade climbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Duration,
    Power,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duration => f.write_str("duration"),
            Self::Power => f.write_str("power"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationTier {
    pub level: u32,
    pub catalyst_cost: u32,
    pub duration_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerTier {
    pub level: u32,
    pub catalyst_cost: u32,
}

/// Why a tier line was skipped
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TierParseError {
    #[error("expected {expected} comma-separated fields, found {found}")]
    Arity { expected: usize, found: usize },

    #[error("field `{field}` is not a positive integer: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
}

/// A configuration line that did not make it into the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub axis: Axis,
    pub line: String,
    pub error: TierParseError,
}

#[derive(Debug, Clone, Default)]
pub struct TierTable {
    duration: BTreeMap<u32, DurationTier>,
    power: BTreeMap<u32, PowerTier>,
    skipped: Vec<SkippedLine>,
}

impl TierTable {
    /// Build a table from the two configured line lists.
    ///
    /// Malformed lines are skipped with a warning; blank lines are ignored.
    /// A later line for an already-present level replaces the earlier one.
    pub fn parse<S: AsRef<str>>(duration_lines: &[S], power_lines: &[S]) -> Self {
        let mut table = Self::default();

        for line in duration_lines.iter().map(AsRef::as_ref) {
            if line.trim().is_empty() {
                continue;
            }
            match parse_fields(line, &["level", "catalystCost", "durationSeconds"]) {
                Ok(fields) => {
                    let tier = DurationTier {
                        level: fields[0] as u32,
                        catalyst_cost: fields[1] as u32,
                        duration_secs: fields[2],
                    };
                    table.duration.insert(tier.level, tier);
                }
                Err(error) => table.skip(Axis::Duration, line, error),
            }
        }

        for line in power_lines.iter().map(AsRef::as_ref) {
            if line.trim().is_empty() {
                continue;
            }
            match parse_fields(line, &["level", "catalystCost"]) {
                Ok(fields) => {
                    let tier = PowerTier {
                        level: fields[0] as u32,
                        catalyst_cost: fields[1] as u32,
                    };
                    table.power.insert(tier.level, tier);
                }
                Err(error) => table.skip(Axis::Power, line, error),
            }
        }

        tracing::debug!(
            duration_tiers = table.duration.len(),
            power_tiers = table.power.len(),
            skipped = table.skipped.len(),
            "Parsed tier tables"
        );
        table
    }

    fn skip(&mut self, axis: Axis, line: &str, error: TierParseError) {
        tracing::warn!(%axis, line, error = %error, "Skipping malformed tier line");
        self.skipped.push(SkippedLine {
            axis,
            line: line.to_string(),
            error,
        });
    }

    pub fn max_duration_level(&self) -> u32 {
        self.duration.keys().next_back().copied().unwrap_or(0)
    }

    pub fn max_power_level(&self) -> u32 {
        self.power.keys().next_back().copied().unwrap_or(0)
    }

    pub fn max_level(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Duration => self.max_duration_level(),
            Axis::Power => self.max_power_level(),
        }
    }

    pub fn duration_tier(&self, level: u32) -> Option<&DurationTier> {
        self.duration.get(&level)
    }

    pub fn power_tier(&self, level: u32) -> Option<&PowerTier> {
        self.power.get(&level)
    }

    /// Catalyst cost of reaching `level` on `axis`
    pub fn cost(&self, axis: Axis, level: u32) -> Option<u32> {
        match axis {
            Axis::Duration => self.duration_tier(level).map(|t| t.catalyst_cost),
            Axis::Power => self.power_tier(level).map(|t| t.catalyst_cost),
        }
    }

    /// Levels with a defined entry, ascending
    pub fn levels(&self, axis: Axis) -> Vec<u32> {
        match axis {
            Axis::Duration => self.duration.keys().copied().collect(),
            Axis::Power => self.power.keys().copied().collect(),
        }
    }

    pub fn duration_tiers(&self) -> impl Iterator<Item = &DurationTier> {
        self.duration.values()
    }

    pub fn power_tiers(&self) -> impl Iterator<Item = &PowerTier> {
        self.power.values()
    }

    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }
}

/// Split a line into exactly `names.len()` positive integers
fn parse_fields(line: &str, names: &[&'static str]) -> Result<Vec<u64>, TierParseError> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() != names.len() {
        return Err(TierParseError::Arity {
            expected: names.len(),
            found: parts.len(),
        });
    }

    let mut values = Vec::with_capacity(parts.len());
    for (raw, field) in parts.iter().zip(names) {
        let value = match raw.parse::<u64>() {
            // levels and costs are stored as u32
            Ok(v) if v >= 1 && (*field == "durationSeconds" || v <= u64::from(u32::MAX)) => v,
            _ => {
                return Err(TierParseError::InvalidNumber {
                    field: *field,
                    value: raw.to_string(),
                });
            }
        };
        values.push(value);
    }
    Ok(values)
}
