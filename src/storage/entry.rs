//! Prediction log record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{Error, Result};

/// One served prediction, its input and its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionLogEntry {
    /// Assigned by the store on append when absent
    pub id: Option<Uuid>,
    /// Normalized feature record as submitted
    pub input_data: Value,
    /// Predicted class label
    pub prediction: u8,
    /// Probability of the positive class
    pub probability: f64,
    /// Inference time in milliseconds
    pub latency_ms: f64,
    pub model_name: String,
    pub model_alias: String,
    /// Assigned by the store on append when absent
    pub created_at: Option<DateTime<Utc>>,
}

impl PredictionLogEntry {
    pub fn new(
        input_data: Value,
        prediction: u8,
        probability: f64,
        latency_ms: f64,
        model_name: impl Into<String>,
        model_alias: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            input_data,
            prediction,
            probability,
            latency_ms,
            model_name: model_name.into(),
            model_alias: model_alias.into(),
            created_at: None,
        }
    }

    /// Check the invariants every stored entry must satisfy
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(Error::persistence(format!(
                "probability {} outside [0, 1]",
                self.probability
            )));
        }
        if !(self.latency_ms.is_finite() && self.latency_ms >= 0.0) {
            return Err(Error::persistence(format!(
                "latency {} must be a non-negative number",
                self.latency_ms
            )));
        }
        if self.prediction > 1 {
            return Err(Error::persistence(format!(
                "prediction {} is not a binary label",
                self.prediction
            )));
        }
        Ok(())
    }

    /// Fill in the identifier and timestamp if they are not set yet
    pub fn stamp(mut self) -> Self {
        if self.id.is_none() {
            self.id = Some(Uuid::new_v4());
        }
        if self.created_at.is_none() {
            self.created_at = Some(Utc::now());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(probability: f64, latency_ms: f64) -> PredictionLogEntry {
        PredictionLogEntry::new(json!({}), 1, probability, latency_ms, "m", "Production")
    }

    #[test]
    fn stamp_keeps_existing_values() {
        let id = Uuid::new_v4();
        let mut e = entry(0.5, 1.0);
        e.id = Some(id);
        let stamped = e.stamp();
        assert_eq!(stamped.id, Some(id));
        assert!(stamped.created_at.is_some());
    }

    #[test]
    fn invariants() {
        assert!(entry(0.0, 0.0).validate().is_ok());
        assert!(entry(1.0, 12.5).validate().is_ok());
        assert!(entry(1.01, 1.0).validate().is_err());
        assert!(entry(f64::NAN, 1.0).validate().is_err());
        assert!(entry(0.5, -0.01).validate().is_err());
        assert!(entry(0.5, f64::INFINITY).validate().is_err());

        let mut bad_label = entry(0.5, 1.0);
        bad_label.prediction = 2;
        assert!(bad_label.validate().is_err());
    }
}
