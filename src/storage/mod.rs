//! Prediction log storage
//!
//! Every successful prediction is recorded exactly once through a
//! [`PredictionLogStore`]. The service only appends; reading the log back is
//! left to operators and tests.

pub mod entry;
pub mod log_store;

pub use entry::PredictionLogEntry;
pub use log_store::{MemoryLogStore, PredictionLogStore, SledLogStore};

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::Result;

/// Open the backend named in the configuration
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn PredictionLogStore>> {
    let store: Arc<dyn PredictionLogStore> = match config.backend {
        StorageBackend::Sled => Arc::new(SledLogStore::open(&config.path)?),
        StorageBackend::Memory => Arc::new(MemoryLogStore::new()),
    };
    log::info!("Prediction log backend: {}", store.name());
    Ok(store)
}
