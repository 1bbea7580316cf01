//! Column-addressed feature rows handed to a classifier

use serde::{Deserialize, Serialize};

/// A single cell of a feature frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f64),
    Category(String),
}

impl FeatureValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Number(n) => Some(*n),
            FeatureValue::Category(_) => None,
        }
    }

    pub fn as_category(&self) -> Option<&str> {
        match self {
            FeatureValue::Category(c) => Some(c),
            FeatureValue::Number(_) => None,
        }
    }
}

/// Rows of feature values sharing one column layout
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<String>,
    rows: Vec<Vec<FeatureValue>>,
}

impl FeatureFrame {
    /// Frame holding exactly one row
    pub fn single(columns: &[&str], row: Vec<FeatureValue>) -> Self {
        debug_assert_eq!(columns.len(), row.len());
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: vec![row],
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value of `column` in row `row`
    pub fn get(&self, row: usize, column: &str) -> Option<&FeatureValue> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_column() {
        let frame = FeatureFrame::single(
            &["Age", "OverTime"],
            vec![FeatureValue::Number(30.0), FeatureValue::Category("Yes".into())],
        );
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.get(0, "Age").and_then(|v| v.as_number()), Some(30.0));
        assert_eq!(frame.get(0, "OverTime").and_then(|v| v.as_category()), Some("Yes"));
        assert!(frame.get(0, "Missing").is_none());
        assert!(frame.get(1, "Age").is_none());
    }
}
