//! Feature schema: validation and normalization of incoming employee records

pub mod features;
pub mod frame;
pub mod validation;

pub use features::{
    column_kind, BusinessTravel, ColumnKind, Department, FeatureRecord, Gender, MaritalStatus, OverTime,
    CATEGORICAL_COLUMNS, FEATURE_COLUMNS,
};
pub use frame::{FeatureFrame, FeatureValue};
pub use validation::{normalize_text, Bounds, Choice, FieldViolation, ValidationErrors};
