//! Registered master brewing stands
//!
//! Only stations placed from the marker stand item take part in upgrades.
//! Positions persist to `stands.txt` as `world,x,y,z` lines.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use hashbrown::HashSet;

use crate::error::StoreError;
use crate::host::{BlockPos, Host};
use crate::item::{ItemStack, Material, TagValue};

pub const TAG_STAND: &str = "brewmaster:stand";
pub const STAND_FILE: &str = "stands.txt";

const STAND_NAME: &str = "Master Brewing Stand";

/// The placeable marker item for a master brewing stand
pub fn stand_item() -> ItemStack {
    let mut item = ItemStack::new(Material::BrewingStand, 1);
    item.meta
        .tags
        .insert(TAG_STAND.to_string(), TagValue::Flag(true));
    item.meta.display_name = Some(STAND_NAME.to_string());
    item.meta.lore = vec!["Upgrades potions with redstone and glowstone".to_string()];
    item
}

pub fn is_stand_item(item: &ItemStack) -> bool {
    item.material == Material::BrewingStand && item.tag_flag(TAG_STAND)
}

#[derive(Debug, Default)]
pub struct StandRegistry {
    positions: HashSet<BlockPos>,
}

impl StandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted lines, dropping entries that no longer hold up:
    /// unparseable, in an unloaded world, or no longer a brewing stand.
    pub fn load<S: AsRef<str>>(lines: &[S], host: &dyn Host) -> Self {
        let mut registry = Self::new();
        let mut dropped = 0usize;

        for line in lines.iter().map(AsRef::as_ref) {
            if line.trim().is_empty() {
                continue;
            }
            match BlockPos::parse(line) {
                Some(pos) if host.world_loaded(&pos.world) && host.is_brewing_stand(&pos) => {
                    registry.positions.insert(pos);
                }
                _ => dropped += 1,
            }
        }

        tracing::debug!(stands = registry.len(), dropped, "Loaded stand registry");
        registry
    }

    /// [`load`](Self::load) from a stand file; a missing file is empty
    pub fn load_file(path: &Path, host: &dyn Host) -> Result<Self, StoreError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let lines: Vec<&str> = contents.lines().collect();
                Ok(Self::load(&lines, host))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::new()),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn save_file(&self, path: &Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut contents = self.to_lines().join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        fs::write(path, contents).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn contains(&self, pos: &BlockPos) -> bool {
        self.positions.contains(pos)
    }

    /// Returns `false` if the position was already registered
    pub fn insert(&mut self, pos: BlockPos) -> bool {
        self.positions.insert(pos)
    }

    pub fn remove(&mut self, pos: &BlockPos) -> bool {
        self.positions.remove(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockPos> {
        self.positions.iter()
    }

    /// Sorted `world,x,y,z` lines
    pub fn to_lines(&self) -> Vec<String> {
        let mut positions: Vec<&BlockPos> = self.positions.iter().collect();
        positions.sort();
        positions.into_iter().map(BlockPos::to_line).collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
