//! Model registry: alias lookup and artifact loading
//!
//! The serving core only needs two read operations from a registry, captured
//! by [`ModelRegistry`]. [`FileRegistry`] reads a directory tree laid out as
//!
//! ```text
//! <root>/<model name>/registry.json
//! <root>/<model name>/<artifact source path>
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use super::classifier::{Classifier, LogisticPipeline};
use crate::error::{Error, Result};

const URI_SCHEME: &str = "models:/";
const REGISTRY_FILE: &str = "registry.json";

/// A registered model version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVersion {
    /// Monotonic version number assigned by the registry
    pub version: u64,
    /// Training run that produced the artifact
    pub run_id: String,
    /// Artifact location relative to the model directory
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Where a model artifact is addressed: by alias or by explicit version
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelUri {
    Alias { name: String, alias: String },
    Version { name: String, version: u64 },
}

impl ModelUri {
    pub fn alias(name: impl Into<String>, alias: impl Into<String>) -> Self {
        ModelUri::Alias { name: name.into(), alias: alias.into() }
    }

    pub fn version(name: impl Into<String>, version: u64) -> Self {
        ModelUri::Version { name: name.into(), version }
    }

    pub fn name(&self) -> &str {
        match self {
            ModelUri::Alias { name, .. } | ModelUri::Version { name, .. } => name,
        }
    }
}

impl fmt::Display for ModelUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelUri::Alias { name, alias } => write!(f, "{}{}@{}", URI_SCHEME, name, alias),
            ModelUri::Version { name, version } => write!(f, "{}{}/{}", URI_SCHEME, name, version),
        }
    }
}

impl FromStr for ModelUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let rest = s
            .strip_prefix(URI_SCHEME)
            .ok_or_else(|| Error::config(format!("model URI must start with {}: {}", URI_SCHEME, s)))?;
        let invalid = || Error::config(format!("malformed model URI: {}", s));

        if let Some((name, alias)) = rest.split_once('@') {
            if name.is_empty() || alias.is_empty() || name.contains('/') {
                return Err(invalid());
            }
            return Ok(ModelUri::alias(name, alias));
        }
        match rest.split_once('/') {
            Some((name, version)) if !name.is_empty() => {
                let version = version.parse::<u64>().map_err(|_| invalid())?;
                Ok(ModelUri::version(name, version))
            }
            _ => Err(invalid()),
        }
    }
}

/// The read operations the serving core needs from a registry
pub trait ModelRegistry: Send + Sync {
    /// Version currently bound to `alias` for model `name`
    fn get_version_by_alias(&self, name: &str, alias: &str) -> Result<ModelVersion>;

    /// Load the artifact `uri` points at
    fn load_model(&self, uri: &ModelUri) -> Result<Arc<dyn Classifier>>;
}

/// Contents of a model's `registry.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisteredModel {
    pub name: String,
    #[serde(default)]
    pub aliases: HashMap<String, u64>,
    #[serde(default)]
    pub versions: Vec<ModelVersion>,
}

impl RegisteredModel {
    fn by_alias(&self, alias: &str) -> Result<&ModelVersion> {
        let version = self.aliases.get(alias).ok_or_else(|| {
            Error::model_unavailable(format!(
                "no version of {} is bound to alias '{}'",
                self.name, alias
            ))
        })?;
        self.by_version(*version)
    }

    fn by_version(&self, version: u64) -> Result<&ModelVersion> {
        self.versions
            .iter()
            .find(|v| v.version == version)
            .ok_or_else(|| {
                Error::model_unavailable(format!("{} has no version {}", self.name, version))
            })
    }

    fn resolve(&self, uri: &ModelUri) -> Result<&ModelVersion> {
        match uri {
            ModelUri::Alias { alias, .. } => self.by_alias(alias),
            ModelUri::Version { version, .. } => self.by_version(*version),
        }
    }
}

/// Registry backed by a directory of `registry.json` files and JSON artifacts
#[derive(Debug, Clone)]
pub struct FileRegistry {
    root: PathBuf,
}

impl FileRegistry {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn model_dir(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(Error::model_unavailable(format!("invalid model name '{}'", name)));
        }
        Ok(self.root.join(name))
    }

    /// Read a model's registry document
    pub fn read_model(&self, name: &str) -> Result<RegisteredModel> {
        let path = self.model_dir(name)?.join(REGISTRY_FILE);
        let content = std::fs::read(&path).map_err(|e| {
            Error::model_unavailable(format!("cannot read {}: {}", path.display(), e))
        })?;
        let mut model: RegisteredModel = serde_json::from_slice(&content).map_err(|e| {
            Error::model_unavailable(format!("invalid registry file {}: {}", path.display(), e))
        })?;
        if model.name.is_empty() {
            model.name = name.to_string();
        }
        Ok(model)
    }

    /// Write a model's registry document, creating the directory if needed
    pub fn write_model(&self, model: &RegisteredModel) -> Result<()> {
        let dir = self.model_dir(&model.name)?;
        std::fs::create_dir_all(&dir)?;
        let content = serde_json::to_string_pretty(model)?;
        std::fs::write(dir.join(REGISTRY_FILE), content)?;
        Ok(())
    }
}

impl ModelRegistry for FileRegistry {
    fn get_version_by_alias(&self, name: &str, alias: &str) -> Result<ModelVersion> {
        self.read_model(name)?.by_alias(alias).cloned()
    }

    fn load_model(&self, uri: &ModelUri) -> Result<Arc<dyn Classifier>> {
        let model = self.read_model(uri.name())?;
        let version = model.resolve(uri)?;
        let source = Path::new(&version.source);
        if source.is_absolute() || source.components().any(|c| c == std::path::Component::ParentDir) {
            return Err(Error::model_unavailable(format!(
                "artifact source {} escapes the model directory",
                version.source
            )));
        }
        let path = self.model_dir(uri.name())?.join(source);
        let bytes = std::fs::read(&path).map_err(|e| {
            Error::model_unavailable(format!("cannot read artifact {}: {}", path.display(), e))
        })?;
        log::debug!("Loaded artifact {} for {}", path.display(), uri);
        Ok(Arc::new(LogisticPipeline::from_json(&bytes)?))
    }
}

/// Registry held entirely in memory
#[derive(Default, Clone)]
pub struct InMemoryRegistry {
    models: HashMap<String, RegisteredModel>,
    artifacts: HashMap<(String, u64), Arc<dyn Classifier>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `classifier` as `version` of `name`
    pub fn register(
        &mut self,
        name: &str,
        version: u64,
        run_id: &str,
        classifier: Arc<dyn Classifier>,
    ) {
        let entry = self.models.entry(name.to_string()).or_insert_with(|| RegisteredModel {
            name: name.to_string(),
            ..Default::default()
        });
        entry.versions.retain(|v| v.version != version);
        entry.versions.push(ModelVersion {
            version,
            run_id: run_id.to_string(),
            source: format!("memory://{}/{}", name, version),
            created_at: Some(Utc::now()),
        });
        self.artifacts.insert((name.to_string(), version), classifier);
    }

    /// Point `alias` at `version`
    pub fn set_alias(&mut self, name: &str, alias: &str, version: u64) {
        if let Some(model) = self.models.get_mut(name) {
            model.aliases.insert(alias.to_string(), version);
        }
    }

    fn model(&self, name: &str) -> Result<&RegisteredModel> {
        self.models
            .get(name)
            .ok_or_else(|| Error::model_unavailable(format!("model {} is not registered", name)))
    }
}

impl ModelRegistry for InMemoryRegistry {
    fn get_version_by_alias(&self, name: &str, alias: &str) -> Result<ModelVersion> {
        self.model(name)?.by_alias(alias).cloned()
    }

    fn load_model(&self, uri: &ModelUri) -> Result<Arc<dyn Classifier>> {
        let version = self.model(uri.name())?.resolve(uri)?.version;
        self.artifacts
            .get(&(uri.name().to_string(), version))
            .cloned()
            .ok_or_else(|| Error::model_unavailable(format!("no artifact stored for {}", uri)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::classifier::tests::overtime_model;
    use tempfile::TempDir;

    fn write_registry(dir: &Path, aliases: serde_json::Value) {
        let model_dir = dir.join("hr_attrition_model");
        std::fs::create_dir_all(model_dir.join("artifacts")).unwrap();
        std::fs::write(
            model_dir.join("artifacts/v2.json"),
            serde_json::to_vec(&overtime_model()).unwrap(),
        )
        .unwrap();
        let doc = serde_json::json!({
            "name": "hr_attrition_model",
            "aliases": aliases,
            "versions": [
                { "version": 1, "run_id": "run-1", "source": "artifacts/missing.json" },
                { "version": 2, "run_id": "run-2", "source": "artifacts/v2.json" }
            ]
        });
        std::fs::write(model_dir.join(REGISTRY_FILE), doc.to_string()).unwrap();
    }

    #[test]
    fn uri_parsing() {
        let uri: ModelUri = "models:/hr_attrition_model@Production".parse().unwrap();
        assert_eq!(uri, ModelUri::alias("hr_attrition_model", "Production"));
        assert_eq!(uri.to_string(), "models:/hr_attrition_model@Production");

        let uri: ModelUri = "models:/hr_attrition_model/3".parse().unwrap();
        assert_eq!(uri, ModelUri::version("hr_attrition_model", 3));
        assert_eq!(uri.to_string(), "models:/hr_attrition_model/3");

        for bad in ["runs:/abc", "models:/", "models:/name", "models:/@x", "models:/name/v1"] {
            assert!(bad.parse::<ModelUri>().is_err(), "{} should not parse", bad);
        }
    }

    #[test]
    fn file_registry_resolves_alias() {
        let dir = TempDir::new().unwrap();
        write_registry(dir.path(), serde_json::json!({ "Production": 2, "Staging": 1 }));
        let registry = FileRegistry::new(dir.path());

        let version = registry.get_version_by_alias("hr_attrition_model", "Production").unwrap();
        assert_eq!(version.version, 2);
        assert_eq!(version.run_id, "run-2");

        let model = registry
            .load_model(&ModelUri::alias("hr_attrition_model", "Production"))
            .unwrap();
        let frame = crate::schema::features::tests::sample_record().to_frame();
        assert_eq!(model.predict(&frame).unwrap().len(), 1);
    }

    #[test]
    fn file_registry_failures_are_model_unavailable() {
        let dir = TempDir::new().unwrap();
        write_registry(dir.path(), serde_json::json!({ "Staging": 1, "Broken": 7 }));
        let registry = FileRegistry::new(dir.path());

        let unbound = registry.get_version_by_alias("hr_attrition_model", "Production");
        assert!(matches!(unbound, Err(Error::ModelUnavailable(_))));

        let dangling = registry.get_version_by_alias("hr_attrition_model", "Broken");
        assert!(matches!(dangling, Err(Error::ModelUnavailable(_))));

        let missing_artifact = registry.load_model(&ModelUri::alias("hr_attrition_model", "Staging"));
        assert!(matches!(missing_artifact, Err(Error::ModelUnavailable(_))));

        let unknown_model = registry.get_version_by_alias("other_model", "Production");
        assert!(matches!(unknown_model, Err(Error::ModelUnavailable(_))));

        let escaping = registry.get_version_by_alias("../etc", "Production");
        assert!(matches!(escaping, Err(Error::ModelUnavailable(_))));
    }

    #[test]
    fn write_then_read_model() {
        let dir = TempDir::new().unwrap();
        let registry = FileRegistry::new(dir.path());
        let mut model = RegisteredModel {
            name: "m".into(),
            ..Default::default()
        };
        model.aliases.insert("Production".into(), 4);
        registry.write_model(&model).unwrap();
        let read = registry.read_model("m").unwrap();
        assert_eq!(read.aliases.get("Production"), Some(&4));
    }

    #[test]
    fn in_memory_registry() {
        let mut registry = InMemoryRegistry::new();
        registry.register("m", 1, "run-a", Arc::new(overtime_model()));
        assert!(registry.get_version_by_alias("m", "Production").is_err());

        registry.set_alias("m", "Production", 1);
        let version = registry.get_version_by_alias("m", "Production").unwrap();
        assert_eq!(version.run_id, "run-a");
        assert!(registry.load_model(&ModelUri::version("m", 1)).is_ok());
        assert!(registry.load_model(&ModelUri::version("m", 2)).is_err());
    }
}
