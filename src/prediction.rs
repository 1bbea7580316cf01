//! Prediction request handling, independent of the HTTP transport

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result, WithErrorContext};
use crate::latency::{round_to, LatencyTimer};
use crate::model::ModelHandle;
use crate::schema::FeatureRecord;
use crate::storage::{PredictionLogEntry, PredictionLogStore};

/// Body returned by `POST /predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub attrition_prediction: u8,
    pub attrition_probability: f64,
    pub latency_ms: f64,
}

/// Validates, scores and logs one employee record per call
#[derive(Clone)]
pub struct PredictionService {
    model: Arc<ModelHandle>,
    store: Arc<dyn PredictionLogStore>,
}

impl PredictionService {
    pub fn new(model: Arc<ModelHandle>, store: Arc<dyn PredictionLogStore>) -> Self {
        Self { model, store }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Validate an untyped body and predict on it.
    ///
    /// Validation failures return before the model or the log is touched.
    pub async fn predict_json(&self, body: &Value) -> Result<PredictionResponse> {
        let record = FeatureRecord::from_json(body)?;
        self.predict(&record).await
    }

    /// Score a validated record and log it.
    ///
    /// The response is only returned once the log entry is durably written;
    /// a failed append fails the whole request.
    pub async fn predict(&self, record: &FeatureRecord) -> Result<PredictionResponse> {
        let frame = record.to_frame();
        let classifier = self.model.classifier();

        let mut timer = LatencyTimer::new();
        timer.start();
        let labels = classifier.predict(&frame)?;
        let probabilities = classifier.predict_proba(&frame)?;
        let latency_ms = timer.stop()?;

        let prediction = labels
            .first()
            .copied()
            .ok_or_else(|| Error::inference("model returned no label"))?;
        let probability = probabilities
            .first()
            .map(|p| p[1])
            .ok_or_else(|| Error::inference("model returned no probabilities"))?;
        if prediction > 1 {
            return Err(Error::inference(format!("label {} is not 0 or 1", prediction)));
        }
        if !(0.0..=1.0).contains(&probability) {
            return Err(Error::inference(format!("probability {} outside [0, 1]", probability)));
        }

        let meta = self.model.metadata();
        let entry = PredictionLogEntry::new(
            record.to_payload(),
            prediction,
            probability,
            latency_ms,
            meta.name.clone(),
            meta.alias.clone(),
        );
        let stored = self
            .store
            .append(entry)
            .await
            .with_context(format!("writing prediction log to {}", self.store.name()))?;

        log::info!(
            "Prediction {} logged: label={} probability={:.4} latency_ms={}",
            stored.id.map(|id| id.to_string()).unwrap_or_default(),
            prediction,
            probability,
            latency_ms
        );

        Ok(PredictionResponse {
            attrition_prediction: prediction,
            attrition_probability: round_to(probability, 4),
            latency_ms,
        })
    }
}
