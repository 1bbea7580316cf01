//! Append-only prediction log backends

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

use super::entry::PredictionLogEntry;
use crate::error::{Error, Result};

const LOG_TREE: &str = "prediction_logs";

/// Durable, append-only storage for prediction log entries.
///
/// Implementations must accept concurrent appends; each entry is written
/// as a single atomic record.
#[async_trait]
pub trait PredictionLogStore: Send + Sync {
    /// Stamp, validate and durably write `entry`, returning what was stored
    async fn append(&self, entry: PredictionLogEntry) -> Result<PredictionLogEntry>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Prediction log stored in a sled tree, keyed by append order
#[derive(Clone)]
pub struct SledLogStore {
    db: sled::Db,
    tree: sled::Tree,
    path: Option<PathBuf>,
}

impl std::fmt::Debug for SledLogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SledLogStore")
            .field("path", &self.path)
            .finish()
    }
}

impl SledLogStore {
    /// Open or create the log at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::persistence(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        let db = sled::open(&path)
            .map_err(|e| Error::persistence(format!("failed to open {}: {}", path.display(), e)))?;
        Self::with_db(db, Some(path))
    }

    /// Log that lives only as long as the process
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::with_db(db, None)
    }

    fn with_db(db: sled::Db, path: Option<PathBuf>) -> Result<Self> {
        let tree = db.open_tree(LOG_TREE)?;
        Ok(Self { db, tree, path })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// All entries in append order
    pub fn entries(&self) -> Result<Vec<PredictionLogEntry>> {
        self.tree
            .iter()
            .values()
            .map(|value| -> Result<PredictionLogEntry> {
                let bytes = value?;
                Ok(serde_json::from_slice(&bytes)?)
            })
            .collect()
    }
}

#[async_trait]
impl PredictionLogStore for SledLogStore {
    async fn append(&self, entry: PredictionLogEntry) -> Result<PredictionLogEntry> {
        entry.validate()?;
        let entry = entry.stamp();
        let value = serde_json::to_vec(&entry)?;
        // generate_id is monotonic, so big-endian keys iterate in append order.
        let key = self.db.generate_id()?.to_be_bytes();
        self.tree.insert(key, value)?;
        self.tree.flush_async().await?;
        Ok(entry)
    }

    fn name(&self) -> &'static str {
        "sled"
    }
}

/// Prediction log kept in process memory
#[derive(Debug, Default)]
pub struct MemoryLogStore {
    entries: Mutex<Vec<PredictionLogEntry>>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn entries(&self) -> Vec<PredictionLogEntry> {
        self.entries.lock().clone()
    }
}

#[async_trait]
impl PredictionLogStore for MemoryLogStore {
    async fn append(&self, entry: PredictionLogEntry) -> Result<PredictionLogEntry> {
        entry.validate()?;
        let entry = entry.stamp();
        self.entries.lock().push(entry.clone());
        Ok(entry)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
