use thiserror::Error;

use crate::schema::ValidationErrors;

/// Result type for attrition-serve operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a model unavailable error
    pub fn model_unavailable(msg: impl Into<String>) -> Self {
        Error::ModelUnavailable(msg.into())
    }

    /// Create an inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Error::Inference(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Error::Persistence(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Error::Timeout(msg.into())
    }
}

/// Error context trait for adding context to errors
pub trait WithErrorContext {
    fn with_context(self, context: impl Into<String>) -> Self;
}

impl<T> WithErrorContext for Result<T> {
    fn with_context(self, context: impl Into<String>) -> Self {
        self.map_err(|e| {
            let context_str = context.into();
            match e {
                Error::ModelUnavailable(msg) => Error::ModelUnavailable(format!("{}: {}", context_str, msg)),
                Error::Inference(msg) => Error::Inference(format!("{}: {}", context_str, msg)),
                Error::Persistence(msg) => Error::Persistence(format!("{}: {}", context_str, msg)),
                Error::Config(msg) => Error::Config(format!("{}: {}", context_str, msg)),
                Error::Serialization(msg) => Error::Serialization(format!("{}: {}", context_str, msg)),
                Error::Internal(msg) => Error::Internal(format!("{}: {}", context_str, msg)),
                other => other,
            }
        })
    }
}

/// Main error type for attrition-serve
#[derive(Error, Debug)]
pub enum Error {
    /// The feature record failed schema validation
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    /// The model could not be resolved or loaded from the registry
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model failed on a validated input
    #[error("Inference error: {0}")]
    Inference(String),

    /// The prediction log could not be written
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/Deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request did not complete within its deadline
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_is_prefixed() {
        let result: Result<()> = Err(Error::persistence("disk full"));
        let err = result.with_context("append prediction log").unwrap_err();
        assert_eq!(err.to_string(), "Persistence error: append prediction log: disk full");
    }

    #[test]
    fn sled_errors_map_to_persistence() {
        let err: Error = sled::Error::Unsupported("nope".into()).into();
        assert!(matches!(err, Error::Persistence(_)));
    }
}
