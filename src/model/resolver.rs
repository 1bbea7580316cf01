//! Startup model resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::classifier::Classifier;
use super::registry::{ModelRegistry, ModelUri};
use crate::error::{Error, Result, WithErrorContext};

/// Provenance of the model being served
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub name: String,
    pub version: u64,
    pub alias: String,
    pub run_id: String,
}

/// The loaded classifier and where it came from.
///
/// Built once at startup and shared read-only between request handlers.
#[derive(Clone)]
pub struct ModelHandle {
    classifier: Arc<dyn Classifier>,
    metadata: ModelMetadata,
}

impl ModelHandle {
    pub fn new(classifier: Arc<dyn Classifier>, metadata: ModelMetadata) -> Self {
        Self { classifier, metadata }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelHandle")
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Resolves a named model through a registry alias
pub struct ModelResolver<R: ModelRegistry> {
    registry: R,
}

impl<R: ModelRegistry> ModelResolver<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Look up the version bound to `alias` and load exactly that version.
    ///
    /// Loading by version rather than alias keeps the metadata and the
    /// artifact consistent if the alias moves between the two calls.
    pub fn resolve(&self, name: &str, alias: &str) -> Result<ModelHandle> {
        if name.is_empty() || alias.is_empty() {
            return Err(Error::model_unavailable("model name and alias must be non-empty"));
        }
        let version = self
            .registry
            .get_version_by_alias(name, alias)
            .with_context(format!("resolving {}", ModelUri::alias(name, alias)))?;
        let uri = ModelUri::version(name, version.version);
        let classifier = self
            .registry
            .load_model(&uri)
            .with_context(format!("loading {}", uri))?;

        log::info!(
            "Resolved model {} alias {} to version {} (run {})",
            name,
            alias,
            version.version,
            version.run_id
        );

        Ok(ModelHandle::new(
            classifier,
            ModelMetadata {
                name: name.to_string(),
                version: version.version,
                alias: alias.to_string(),
                run_id: version.run_id,
            },
        ))
    }
}
