use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main configuration for the prediction service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Model registry configuration
    pub registry: RegistryConfig,

    /// Prediction log configuration
    pub storage: StorageConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Number of worker threads
    pub workers: usize,

    /// Per-request deadline in seconds, for both the request head and prediction handling
    pub timeout_secs: u64,

    /// Maximum accepted JSON body size in bytes
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            workers: num_cpus::get(),
            timeout_secs: 30,
            max_payload_bytes: 64 * 1024,
        }
    }
}

/// Where the served model comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Root directory of the file registry
    pub path: PathBuf,

    /// Registered model name
    pub model_name: String,

    /// Deployment alias to serve
    pub model_alias: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./registry"),
            model_name: "hr_attrition_model".to_string(),
            model_alias: "Production".to_string(),
        }
    }
}

/// Prediction log backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Durable sled database
    Sled,
    /// Process memory, lost on exit
    Memory,
}

/// Prediction log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// Path to the sled database
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sled,
            path: PathBuf::from("./data/prediction_logs"),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::config("server.port must be non-zero"));
        }
        if self.server.workers == 0 {
            return Err(Error::config("server.workers must be at least 1"));
        }
        if self.server.timeout_secs == 0 {
            return Err(Error::config("server.timeout_secs must be at least 1"));
        }
        if self.server.max_payload_bytes == 0 {
            return Err(Error::config("server.max_payload_bytes must be non-zero"));
        }
        if self.registry.model_name.trim().is_empty() {
            return Err(Error::config("registry.model_name must not be empty"));
        }
        if self.registry.model_alias.trim().is_empty() {
            return Err(Error::config("registry.model_alias must not be empty"));
        }
        Ok(())
    }
}
