//! File-backed slot store: one JSON file per slot.
//!
//! Publish is write-to-temp-then-rename so a concurrent reader never sees a
//! half-written payload. Consume is read-then-delete; the two steps are not
//! atomic, so a crash in between can re-deliver, and a delete racing a fresh
//! publish can drop that fresh job. Both are accepted: the channel promises
//! best-effort at-most-once, not exactly-once.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use super::write_atomic;
use crate::error::StoreError;
use crate::ports::SlotStore;

#[derive(Debug)]
pub struct FileSlotStore {
    dir: PathBuf,
}

impl FileSlotStore {
    /// Open a slot store rooted at `dir`, creating the directory if needed.
    /// Failure here is fatal configuration, not a transient condition.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Config {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    /// Read a slot file, mapping "not found" to `None` and a corrupt
    /// payload to `None` after discarding the file. Any other IO error is
    /// transient: the job may still be there on the next tick.
    fn read_slot(&self, slot: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(slot);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Transient { path, source }),
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(slot, error = %e, "malformed slot payload, discarding");
                if let Err(e) = fs::remove_file(&path) {
                    debug!(slot, error = %e, "could not remove malformed slot file");
                }
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl SlotStore for FileSlotStore {
    async fn publish(&self, slot: &str, payload: &Value) -> Result<(), StoreError> {
        let path = self.path_for(slot);
        let bytes = serde_json::to_vec_pretty(payload).map_err(|e| StoreError::Transient {
            path: path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        write_atomic(&path, &bytes).map_err(|source| StoreError::Transient { path, source })?;
        debug!(slot, "published");
        Ok(())
    }

    async fn try_consume(&self, slot: &str) -> Result<Option<Value>, StoreError> {
        let Some(value) = self.read_slot(slot)? else {
            return Ok(None);
        };
        // Delete failure after a successful read still counts as consumed:
        // the caller owns the payload now. The file may survive to be
        // re-delivered, or a racing publish may have replaced it already.
        if let Err(e) = fs::remove_file(self.path_for(slot)) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!(slot, error = %e, "consumed but could not remove slot file");
            }
        }
        debug!(slot, "consumed");
        Ok(Some(value))
    }

    async fn peek(&self, slot: &str) -> Result<Option<Value>, StoreError> {
        self.read_slot(slot)
    }
}
