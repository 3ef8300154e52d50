//! Active effect records and the per-actor registry
//!
//! The registry is the source of truth for every effect this engine has
//! granted. Records are never edited in place: activation replaces, expiry
//! removes.

use hashbrown::HashMap;
use thiserror::Error;

use crate::host::ActorId;

use super::EffectKind;

/// One granted effect on one actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveEffectRecord {
    pub effect: EffectKind,
    pub amplifier: u32,
    pub expires_at_ms: i64,
}

/// Why a persisted record line was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("expected 3 comma-separated fields, found {0}")]
    Arity(usize),

    #[error("unrecognized effect `{0}`")]
    UnknownEffect(String),

    #[error("invalid amplifier {0:?}")]
    InvalidAmplifier(String),

    #[error("invalid expiry timestamp {0:?}")]
    InvalidExpiry(String),
}

impl ActiveEffectRecord {
    pub fn new(effect: EffectKind, amplifier: u32, expires_at_ms: i64) -> Self {
        Self {
            effect,
            amplifier,
            expires_at_ms,
        }
    }

    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        self.expires_at_ms.saturating_sub(now_ms)
    }

    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.remaining_ms(now_ms) <= 0
    }

    /// `effectId,amplifier,expiresAtEpochMillis`
    pub fn to_line(&self) -> String {
        format!("{},{},{}", self.effect.id(), self.amplifier, self.expires_at_ms)
    }

    pub fn parse_line(line: &str) -> Result<Self, RecordParseError> {
        let parts: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        let [effect, amplifier, expires] = parts.as_slice() else {
            return Err(RecordParseError::Arity(parts.len()));
        };

        let effect = EffectKind::parse(effect)
            .ok_or_else(|| RecordParseError::UnknownEffect(effect.to_string()))?;
        let amplifier = amplifier
            .parse::<u32>()
            .map_err(|_| RecordParseError::InvalidAmplifier(amplifier.to_string()))?;
        let expires_at_ms = expires
            .parse::<i64>()
            .map_err(|_| RecordParseError::InvalidExpiry(expires.to_string()))?;

        Ok(Self::new(effect, amplifier, expires_at_ms))
    }
}

/// Actor → active records. An actor with no records has no entry.
#[derive(Debug, Default)]
pub struct EffectRegistry {
    actors: HashMap<ActorId, Vec<ActiveEffectRecord>>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh activation, replacing any record of the same effect.
    /// Returns the replaced record.
    pub fn activate(
        &mut self,
        actor: &ActorId,
        record: ActiveEffectRecord,
    ) -> Option<ActiveEffectRecord> {
        let records = self.actors.entry(actor.clone()).or_default();
        let replaced = records
            .iter()
            .position(|r| r.effect == record.effect)
            .map(|idx| records.remove(idx));
        records.push(record);
        replaced
    }

    pub fn records(&self, actor: &ActorId) -> &[ActiveEffectRecord] {
        self.actors.get(actor).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, actor: &ActorId, effect: EffectKind) -> Option<&ActiveEffectRecord> {
        self.records(actor).iter().find(|r| r.effect == effect)
    }

    /// Replace an actor's whole list; an empty list drops the actor
    pub fn replace(&mut self, actor: &ActorId, records: Vec<ActiveEffectRecord>) {
        if records.is_empty() {
            self.actors.remove(actor);
        } else {
            self.actors.insert(actor.clone(), records);
        }
    }

    /// Remove and return an actor's records (disconnect flush)
    pub fn take(&mut self, actor: &ActorId) -> Vec<ActiveEffectRecord> {
        self.actors.remove(actor).unwrap_or_default()
    }

    pub fn actors(&self) -> impl Iterator<Item = &ActorId> {
        self.actors.keys()
    }

    pub fn contains_actor(&self, actor: &ActorId) -> bool {
        self.actors.contains_key(actor)
    }

    /// Number of actors with at least one record
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}
