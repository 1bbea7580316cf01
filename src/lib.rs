//! attrition-serve - HR attrition prediction service
//!
//! Loads the classifier bound to a deployment alias in a model registry,
//! serves predictions over HTTP and records every served prediction in an
//! append-only log.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use attrition_serve::{model, storage, Config, Result};
//! use attrition_serve::prediction::PredictionService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();
//!     let handle = Arc::new(model::resolve_from_config(&config.registry)?);
//!     let store = storage::open_store(&config.storage)?;
//!     let service = PredictionService::new(handle, store);
//!     let body = serde_json::json!({ "Age": 30 });
//!     let _ = service.predict_json(&body).await;
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;
pub mod config;

pub mod schema;
pub mod model;
pub mod latency;
pub mod storage;
pub mod prediction;

pub mod api;

// Re-export commonly used types
pub use error::{Error, Result};
pub use config::Config;
pub use model::{ModelHandle, ModelMetadata};
pub use prediction::{PredictionResponse, PredictionService};
pub use schema::{FeatureRecord, ValidationErrors};
pub use storage::{PredictionLogEntry, PredictionLogStore};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize logging at `default_level` unless `RUST_LOG` says otherwise
pub fn init_logging(default_level: &str) -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
        .map_err(|e| Error::config(format!("Failed to initialize logger: {}", e)))?;
    log::info!("{} {} initialized", NAME, VERSION);
    Ok(())
}
