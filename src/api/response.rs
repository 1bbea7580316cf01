//! API response envelopes

use serde::{Deserialize, Serialize};

use crate::model::ModelMetadata;

/// Envelope for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Error summary
    pub error: Option<String>,
    /// HTTP status code
    pub code: Option<i32>,
    /// Structured detail, e.g. per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Error response carrying structured details
    pub fn error_with_details(msg: impl Into<String>, code: i32, details: T) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            code: Some(code),
            details: Some(details),
        }
    }
}

impl ApiResponse<()> {
    /// Error response without details
    pub fn error(msg: impl Into<String>, code: i32) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            code: Some(code),
            details: None,
        }
    }
}

/// Body of `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Model being served
    pub model: ModelMetadata,
}
