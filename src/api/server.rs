//! Shared state for request handlers

use std::sync::Arc;
use std::time::Duration;

use crate::model::ModelHandle;
use crate::prediction::PredictionService;
use crate::storage::PredictionLogStore;

/// State handed to every handler.
///
/// Only constructed once the model has been resolved, so a running server
/// always has a model to serve.
#[derive(Clone)]
pub struct ApiServerState {
    pub prediction: PredictionService,
    /// Deadline for handling one prediction, body extraction excluded
    pub request_timeout: Duration,
}

impl ApiServerState {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(model: Arc<ModelHandle>, store: Arc<dyn PredictionLogStore>) -> Self {
        Self {
            prediction: PredictionService::new(model, store),
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn model(&self) -> &ModelHandle {
        self.prediction.model()
    }
}
