//! File-backed journal: one JSON document per log, newest first.
//!
//! `append` is a read-modify-write of the whole document. The mutex is held
//! across all three steps, which closes the lost-update race between writers
//! sharing this process. Writers in *other* processes are not excluded; that
//! is a known limitation of the single-document layout.

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::warn;

use super::write_atomic;
use crate::domain::{EntryId, Notification};
use crate::error::StoreError;
use crate::ports::Journal;

pub struct FileJournal<E> {
    path: PathBuf,
    lock: Mutex<()>,
    _marker: PhantomData<fn() -> E>,
}

impl<E> FileJournal<E>
where
    E: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Open the journal `name` under `dir`, creating the directory if
    /// needed. The file itself is created lazily on first append.
    pub fn open(dir: impl Into<PathBuf>, name: &str) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Config {
            path: dir.clone(),
            source,
        })?;
        Ok(Self {
            path: dir.join(format!("{name}.json")),
            lock: Mutex::new(()),
            _marker: PhantomData,
        })
    }

    /// Load the full collection. Absent or corrupt reads as empty; a corrupt
    /// log is logged and will be overwritten by the next append.
    fn load(&self) -> Vec<E> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "journal unreadable");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "journal corrupt, treating as empty");
            Vec::new()
        })
    }

    fn store(&self, entries: &[E]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(entries).map_err(|e| StoreError::Transient {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        write_atomic(&self.path, &bytes).map_err(|source| StoreError::Transient {
            path: self.path.clone(),
            source,
        })
    }
}

#[async_trait]
impl<E> Journal<E> for FileJournal<E>
where
    E: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn append(&self, entry: E) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load();
        entries.insert(0, entry);
        self.store(&entries)
    }

    async fn read_all(&self) -> Result<Vec<E>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.load())
    }
}

impl FileJournal<Notification> {
    /// Flip the `read` flag on one notification. Returns `false` when the
    /// id is unknown.
    pub async fn mark_read(&self, id: &EntryId) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load();
        let Some(entry) = entries.iter_mut().find(|n| n.id == *id) else {
            return Ok(false);
        };
        entry.read = true;
        self.store(&entries)?;
        Ok(true)
    }
}
