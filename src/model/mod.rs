//! Model registry access and the process-wide model handle

pub mod classifier;
pub mod registry;
pub mod resolver;

pub use classifier::{CategoricalTerm, Classifier, LogisticPipeline, NumericTerm};
pub use registry::{FileRegistry, InMemoryRegistry, ModelRegistry, ModelUri, ModelVersion, RegisteredModel};
pub use resolver::{ModelHandle, ModelMetadata, ModelResolver};

use crate::config::RegistryConfig;
use crate::error::Result;

/// Resolve the configured model from the file registry.
///
/// Any failure here must stop startup.
pub fn resolve_from_config(config: &RegistryConfig) -> Result<ModelHandle> {
    ModelResolver::new(FileRegistry::new(&config.path))
        .resolve(&config.model_name, &config.model_alias)
}
