//! Host simulation boundary
//!
//! The engine never touches host state directly. Everything it reads or
//! writes about actors, items and blocks goes through the [`Host`] trait,
//! and everything the host tells the engine arrives as a
//! [`HostSignal`](crate::engine::HostSignal).

use std::fmt;

use brewmaster_types::formatting::{format_amplifier, format_remaining};
use serde::{Deserialize, Serialize};

use crate::effects::EffectKind;
use crate::item::ItemStack;

/// Host ticks per real second
pub const TICKS_PER_SECOND: u64 = 20;

/// Stable identity of a connected actor (a player UUID on most hosts)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(String);

impl ActorId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File-system safe stem for this actor's persisted records
    pub(crate) fn file_stem(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A block coordinate in a named world
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub world: String,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(world: impl Into<String>, x: i32, y: i32, z: i32) -> Self {
        Self {
            world: world.into(),
            x,
            y,
            z,
        }
    }

    /// Parse a `world,x,y,z` line
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.trim().split(',').map(str::trim).collect();
        let [world, x, y, z] = parts.as_slice() else {
            return None;
        };
        if world.is_empty() {
            return None;
        }
        Some(Self {
            world: world.to_string(),
            x: x.parse().ok()?,
            y: y.parse().ok()?,
            z: z.parse().ok()?,
        })
    }

    pub fn to_line(&self) -> String {
        format!("{},{},{},{}", self.world, self.x, self.y, self.z)
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

/// Actor game mode, as far as flight is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameMode {
    #[default]
    Survival,
    Adventure,
    Creative,
    Spectator,
}

impl GameMode {
    /// Modes in which the host grants flight on its own
    pub fn grants_flight(self) -> bool {
        matches!(self, Self::Creative | Self::Spectator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hand {
    #[default]
    Main,
    Off,
}

/// An effect as the host currently sees it on an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiveEffect {
    pub amplifier: u32,
    pub remaining_ticks: u32,
}

/// A timed effect for the host to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectGrant {
    pub effect: &'static str,
    pub amplifier: u32,
    pub duration_ticks: u32,
    /// Host "ambient" flag: quieter particles, removable on empty-hand toggle
    pub ambient: bool,
    /// Whether the host shows particles and its end-of-effect flourish
    pub particles: bool,
}

impl EffectGrant {
    /// Grant used by activation and reconciliation: ambient, no flourish
    pub fn ambient(effect: &'static str, amplifier: u32, duration_ticks: u32) -> Self {
        Self {
            effect,
            amplifier,
            duration_ticks,
            ambient: true,
            particles: false,
        }
    }
}

/// Feedback shown to an actor. Wording is cosmetic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Activated {
        effect: EffectKind,
        amplifier: u32,
        duration_secs: u64,
    },
    ExpiringSoon {
        effect: EffectKind,
        remaining_secs: u64,
    },
    Expired {
        effect: EffectKind,
    },
    InvalidItem {
        reason: String,
    },
    StandPlaced,
    StandRemoved,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Activated {
                effect,
                amplifier,
                duration_secs,
            } => write!(
                f,
                "{} {} active for {}",
                effect.display_name(),
                format_amplifier(*amplifier),
                format_remaining(*duration_secs)
            ),
            Self::ExpiringSoon {
                effect,
                remaining_secs,
            } => write!(
                f,
                "{} expires in {}",
                effect.display_name(),
                format_remaining(*remaining_secs)
            ),
            Self::Expired { effect } => write!(f, "{} has worn off", effect.display_name()),
            Self::InvalidItem { reason } => write!(f, "This potion cannot be used: {}", reason),
            Self::StandPlaced => f.write_str("Master brewing stand placed"),
            Self::StandRemoved => f.write_str("Master brewing stand removed"),
        }
    }
}

/// Everything the engine needs from the host simulation.
///
/// Implementations are called from the host's tick thread only.
pub trait Host {
    /// Wall-clock time in epoch milliseconds
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    fn connected_actors(&self) -> Vec<ActorId>;
    fn is_connected(&self, actor: &ActorId) -> bool;
    fn game_mode(&self, actor: &ActorId) -> GameMode;

    // ─── Timed effects ──────────────────────────────────────────────────────
    fn live_effect(&self, actor: &ActorId, effect: &str) -> Option<LiveEffect>;
    fn grant_effect(&mut self, actor: &ActorId, grant: EffectGrant);
    fn remove_effect(&mut self, actor: &ActorId, effect: &str);

    // ─── Flight ─────────────────────────────────────────────────────────────
    fn allow_flight(&self, actor: &ActorId) -> bool;
    fn set_allow_flight(&mut self, actor: &ActorId, allowed: bool);
    fn set_flying(&mut self, actor: &ActorId, flying: bool);
    fn set_fly_speed(&mut self, actor: &ActorId, speed: f32);

    // ─── Items and blocks ───────────────────────────────────────────────────
    /// Remove `amount` units from the stack held in `hand`
    fn take_from_hand(&mut self, actor: &ActorId, hand: Hand, amount: u32);
    fn give_item(&mut self, actor: &ActorId, item: ItemStack);
    fn drop_item(&mut self, pos: &BlockPos, item: ItemStack);
    /// Replace the three consumable slots and the catalyst slot of a station
    fn write_brewing_station(
        &mut self,
        pos: &BlockPos,
        slots: [Option<ItemStack>; 3],
        catalyst: Option<ItemStack>,
    );
    fn world_loaded(&self, world: &str) -> bool;
    fn is_brewing_stand(&self, pos: &BlockPos) -> bool;

    // ─── Feedback ───────────────────────────────────────────────────────────
    fn notify(&mut self, actor: &ActorId, notice: Notice);

    /// Continuous status line (action bar on most hosts)
    fn show_status(&mut self, _actor: &ActorId, _text: &str) {}
}
