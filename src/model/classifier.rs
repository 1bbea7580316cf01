//! Inference objects loaded from the registry

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::schema::{column_kind, ColumnKind, FeatureFrame};

/// A loaded binary classifier.
///
/// Both calls take a whole frame and return one result per row. In
/// `predict_proba` the second column is the probability of class `1`.
pub trait Classifier: Send + Sync {
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<u8>>;

    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<[f64; 2]>>;
}

/// Standardized numeric input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericTerm {
    pub column: String,
    pub mean: f64,
    pub scale: f64,
    pub coef: f64,
}

/// One-hot encoded categorical input; categories not listed contribute nothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTerm {
    pub column: String,
    pub weights: HashMap<String, f64>,
}

fn default_threshold() -> f64 {
    0.5
}

/// Logistic regression over standardized numeric and one-hot categorical features.
///
/// This is the on-disk artifact format of the file registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticPipeline {
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default)]
    pub numeric: Vec<NumericTerm>,
    #[serde(default)]
    pub categorical: Vec<CategoricalTerm>,
}

impl LogisticPipeline {
    /// Parse and check an artifact
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let pipeline: Self = serde_json::from_slice(bytes)
            .map_err(|e| Error::model_unavailable(format!("invalid model artifact: {}", e)))?;
        pipeline.validate()?;
        Ok(pipeline)
    }

    /// Reject artifacts that could produce non-finite scores or reference unknown columns
    pub fn validate(&self) -> Result<()> {
        if !self.intercept.is_finite() {
            return Err(Error::model_unavailable("intercept is not finite"));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(Error::model_unavailable(format!(
                "threshold {} outside (0, 1)",
                self.threshold
            )));
        }
        for term in &self.numeric {
            check_column(&term.column, ColumnKind::Numeric)?;
            if !(term.mean.is_finite() && term.coef.is_finite()) {
                return Err(Error::model_unavailable(format!(
                    "non-finite parameter for {}",
                    term.column
                )));
            }
            if !(term.scale.is_finite() && term.scale > 0.0) {
                return Err(Error::model_unavailable(format!(
                    "scale for {} must be positive",
                    term.column
                )));
            }
        }
        for term in &self.categorical {
            check_column(&term.column, ColumnKind::Categorical)?;
            if let Some((category, _)) = term.weights.iter().find(|(_, w)| !w.is_finite()) {
                return Err(Error::model_unavailable(format!(
                    "non-finite weight for {}={}",
                    term.column, category
                )));
            }
        }
        Ok(())
    }

    fn decision(&self, frame: &FeatureFrame, row: usize) -> Result<f64> {
        let mut z = self.intercept;
        for term in &self.numeric {
            let x = frame
                .get(row, &term.column)
                .and_then(|v| v.as_number())
                .ok_or_else(|| {
                    Error::inference(format!("numeric column {} missing from frame", term.column))
                })?;
            z += term.coef * (x - term.mean) / term.scale;
        }
        for term in &self.categorical {
            let category = frame
                .get(row, &term.column)
                .and_then(|v| v.as_category())
                .ok_or_else(|| {
                    Error::inference(format!(
                        "categorical column {} missing from frame",
                        term.column
                    ))
                })?;
            z += term.weights.get(category).copied().unwrap_or(0.0);
        }
        Ok(z)
    }
}

fn check_column(column: &str, expected: ColumnKind) -> Result<()> {
    match column_kind(column) {
        Some(kind) if kind == expected => Ok(()),
        Some(kind) => Err(Error::model_unavailable(format!(
            "column {} is {:?}, term expects {:?}",
            column, kind, expected
        ))),
        None => Err(Error::model_unavailable(format!("unknown feature column {}", column))),
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

impl Classifier for LogisticPipeline {
    fn predict(&self, frame: &FeatureFrame) -> Result<Vec<u8>> {
        self.predict_proba(frame).map(|probs| {
            probs
                .iter()
                .map(|p| u8::from(p[1] >= self.threshold))
                .collect()
        })
    }

    fn predict_proba(&self, frame: &FeatureFrame) -> Result<Vec<[f64; 2]>> {
        (0..frame.len())
            .map(|row| {
                let p = sigmoid(self.decision(frame, row)?);
                Ok([1.0 - p, p])
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::schema::features::tests::sample_record;
    use crate::schema::{FeatureValue, FEATURE_COLUMNS};

    pub(crate) fn overtime_model() -> LogisticPipeline {
        LogisticPipeline {
            intercept: -1.0,
            threshold: 0.5,
            numeric: vec![NumericTerm {
                column: "Age".into(),
                mean: 36.0,
                scale: 9.0,
                coef: -0.5,
            }],
            categorical: vec![CategoricalTerm {
                column: "OverTime".into(),
                weights: HashMap::from([("Yes".to_string(), 2.0)]),
            }],
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = overtime_model();
        let frame = sample_record().to_frame();
        let probs = model.predict_proba(&frame).unwrap();
        assert_eq!(probs.len(), 1);
        assert!((probs[0][0] + probs[0][1] - 1.0).abs() < 1e-12);
        // z = -1 + 2 + (-0.5 * (30 - 36) / 9) = 1.333..
        let expected = sigmoid(1.0 + 1.0 / 3.0);
        assert!((probs[0][1] - expected).abs() < 1e-12);
        assert_eq!(model.predict(&frame).unwrap(), vec![1]);
    }

    #[test]
    fn unseen_category_contributes_nothing() {
        let model = overtime_model();
        let mut values = sample_record().values();
        let idx = FEATURE_COLUMNS.iter().position(|c| *c == "OverTime").unwrap();
        values[idx] = FeatureValue::Category("No".into());
        let frame = FeatureFrame::single(&FEATURE_COLUMNS, values);
        let p = model.predict_proba(&frame).unwrap()[0][1];
        assert!((p - sigmoid(-1.0 + 1.0 / 3.0)).abs() < 1e-12);
        assert_eq!(model.predict(&frame).unwrap(), vec![0]);
    }

    #[test]
    fn missing_column_is_an_inference_error() {
        let model = overtime_model();
        let frame = FeatureFrame::single(&["OverTime"], vec![FeatureValue::Category("Yes".into())]);
        assert!(matches!(model.predict_proba(&frame), Err(Error::Inference(_))));
    }

    #[test]
    fn artifact_validation() {
        let good = serde_json::to_vec(&overtime_model()).unwrap();
        assert_eq!(LogisticPipeline::from_json(&good).unwrap(), overtime_model());

        let no_threshold = br#"{"intercept": 0.1, "numeric": [], "categorical": []}"#;
        assert_eq!(LogisticPipeline::from_json(no_threshold).unwrap().threshold, 0.5);

        let mut bad_scale = overtime_model();
        bad_scale.numeric[0].scale = 0.0;
        assert!(bad_scale.validate().is_err());

        let mut bad_column = overtime_model();
        bad_column.categorical[0].column = "Salary".into();
        assert!(matches!(bad_column.validate(), Err(Error::ModelUnavailable(_))));

        assert!(LogisticPipeline::from_json(b"not json").is_err());
    }

    #[test]
    fn terms_must_match_column_kind() {
        let numeric_on_category =
            br#"{"intercept": 0, "numeric": [{"column": "Gender", "mean": 0, "scale": 1, "coef": 1}]}"#;
        assert!(matches!(
            LogisticPipeline::from_json(numeric_on_category),
            Err(Error::ModelUnavailable(_))
        ));

        let mut category_on_number = overtime_model();
        category_on_number.categorical[0].column = "Age".into();
        assert!(matches!(category_on_number.validate(), Err(Error::ModelUnavailable(_))));
    }
}
