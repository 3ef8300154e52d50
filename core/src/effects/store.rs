//! Per-actor effect files
//!
//! One plain-text file per actor under `<data_dir>/effects/`, one record per
//! line. Loading is forgiving: a bad line is logged and skipped, never fatal
//! to the rest of the file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::host::ActorId;

use super::ActiveEffectRecord;

const EFFECTS_DIR: &str = "effects";

#[derive(Debug, Clone)]
pub struct EffectStore {
    dir: PathBuf,
}

impl EffectStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: data_dir.as_ref().join(EFFECTS_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, actor: &ActorId) -> PathBuf {
        self.dir.join(format!("{}.txt", actor.file_stem()))
    }

    /// Persist `records`; an empty list deletes the actor's file
    pub fn save(&self, actor: &ActorId, records: &[ActiveEffectRecord]) -> Result<(), StoreError> {
        let path = self.path_for(actor);

        if records.is_empty() {
            return match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(actor = %actor, "Removed empty effect file");
                    Ok(())
                }
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StoreError::Io { path, source }),
            };
        }

        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut contents = String::new();
        for record in records {
            contents.push_str(&record.to_line());
            contents.push('\n');
        }
        fs::write(&path, contents).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(actor = %actor, records = records.len(), "Saved effect file");
        Ok(())
    }

    /// Read an actor's surviving records.
    ///
    /// Unparseable lines and records already expired at `now_ms` are dropped.
    /// If one effect appears twice, the later line wins. A missing file is an
    /// empty list.
    pub fn load(&self, actor: &ActorId, now_ms: i64) -> Result<Vec<ActiveEffectRecord>, StoreError> {
        let path = self.path_for(actor);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let mut records: Vec<ActiveEffectRecord> = Vec::new();
        let mut expired = 0usize;
        for (idx, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match ActiveEffectRecord::parse_line(line) {
                Ok(record) if record.is_expired(now_ms) => expired += 1,
                Ok(record) => {
                    records.retain(|r| r.effect != record.effect);
                    records.push(record);
                }
                Err(error) => {
                    tracing::warn!(
                        actor = %actor,
                        line = idx + 1,
                        error = %error,
                        "Skipping corrupt effect record"
                    );
                }
            }
        }

        tracing::debug!(
            actor = %actor,
            loaded = records.len(),
            expired,
            "Loaded effect file"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;

    const NOW: i64 = 1_700_000_000_000;

    fn speed(expires: i64) -> ActiveEffectRecord {
        ActiveEffectRecord::new(EffectKind::Standard("speed"), 1, expires)
    }

    fn fly(expires: i64) -> ActiveEffectRecord {
        ActiveEffectRecord::new(EffectKind::Flight, 0, expires)
    }

    #[test]
    fn test_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EffectStore::new(tmp.path());
        let actor = ActorId::new("steve");
        let records = vec![speed(NOW + 10_000), fly(NOW + 60_000)];

        store.save(&actor, &records).unwrap();
        assert_eq!(store.load(&actor, NOW).unwrap(), records);
    }

    #[test]
    fn test_load_drops_expired() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EffectStore::new(tmp.path());
        let actor = ActorId::new("steve");

        store
            .save(&actor, &[speed(NOW + 10_000), fly(NOW + 60_000)])
            .unwrap();
        assert_eq!(store.load(&actor, NOW + 10_000).unwrap(), vec![fly(NOW + 60_000)]);
    }

    #[test]
    fn test_save_empty_deletes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EffectStore::new(tmp.path());
        let actor = ActorId::new("steve");

        store.save(&actor, &[speed(NOW + 1_000)]).unwrap();
        assert!(store.path_for(&actor).exists());

        store.save(&actor, &[]).unwrap();
        assert!(!store.path_for(&actor).exists());

        // deleting twice is fine
        store.save(&actor, &[]).unwrap();
    }

    #[test]
    fn test_missing_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EffectStore::new(tmp.path());
        assert!(store.load(&ActorId::new("nobody"), NOW).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let store = EffectStore::new(tmp.path());
        let actor = ActorId::new("alex");
        fs::create_dir_all(store.dir()).unwrap();
        let far = NOW + 90_000;
        fs::write(
            store.path_for(&actor),
            format!(
                "speed,1,{far}\n\ngarbage\nteleport,0,{far}\nfly,x,{far}\nfly,2,{far}\nspeed,3,{far}\n"
            ),
        )
        .unwrap();

        let records = store.load(&actor, NOW).unwrap();
        assert_eq!(
            records,
            vec![
                ActiveEffectRecord::new(EffectKind::Flight, 2, far),
                ActiveEffectRecord::new(EffectKind::Standard("speed"), 3, far),
            ]
        );
    }
}
