//! Field-level validation for loosely typed JSON records.
//!
//! [`FieldReader`] walks a JSON object one field at a time and records every
//! violation instead of stopping at the first one, so a rejected record
//! reports all of its problems at once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Pseudo field name used when the body itself is not an object
pub const BODY_FIELD: &str = "body";

/// One violated constraint on one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Wire name of the offending field
    pub field: String,
    /// Human readable description of the violated constraint
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every violation found in a rejected record, in field order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldViolation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldViolation::new(field, message)])
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }

    /// Whether any violation references `field`
    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} invalid field(s)", self.0.len())?;
        for (i, v) in self.0.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}: {}", sep, v.field, v.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// One side of a numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Inclusive(i64),
    Exclusive(i64),
}

/// Numeric range constraint for an integer field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

impl Bounds {
    pub const fn any() -> Self {
        Self { lower: None, upper: None }
    }

    /// Strictly greater than `v`
    pub const fn gt(v: i64) -> Self {
        Self { lower: Some(Bound::Exclusive(v)), upper: None }
    }

    /// Greater than or equal to `v`
    pub const fn ge(v: i64) -> Self {
        Self { lower: Some(Bound::Inclusive(v)), upper: None }
    }

    /// Strictly less than `v`
    pub const fn lt(self, v: i64) -> Self {
        Self { lower: self.lower, upper: Some(Bound::Exclusive(v)) }
    }

    /// Less than or equal to `v`
    pub const fn le(self, v: i64) -> Self {
        Self { lower: self.lower, upper: Some(Bound::Inclusive(v)) }
    }

    /// Describe the first bound `value` violates, if any
    pub fn check(&self, value: i64) -> Option<String> {
        match self.lower {
            Some(Bound::Exclusive(b)) if value <= b => {
                return Some(format!("Input should be greater than {}", b));
            }
            Some(Bound::Inclusive(b)) if value < b => {
                return Some(format!("Input should be greater than or equal to {}", b));
            }
            _ => {}
        }
        match self.upper {
            Some(Bound::Exclusive(b)) if value >= b => {
                Some(format!("Input should be less than {}", b))
            }
            Some(Bound::Inclusive(b)) if value > b => {
                Some(format!("Input should be less than or equal to {}", b))
            }
            _ => None,
        }
    }
}

/// A closed set of accepted string values
pub trait Choice: Sized + Copy + 'static {
    /// Accepted wire values and the variant each maps to
    const VARIANTS: &'static [(&'static str, Self)];

    fn parse(s: &str) -> Option<Self> {
        Self::VARIANTS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, v)| *v)
    }

    fn expected() -> String {
        let names: Vec<String> = Self::VARIANTS
            .iter()
            .map(|(name, _)| format!("'{}'", name))
            .collect();
        match names.split_last() {
            Some((last, rest)) if !rest.is_empty() => {
                format!("Input should be {} or {}", rest.join(", "), last)
            }
            Some((last, _)) => format!("Input should be {}", last),
            None => "No value is accepted".to_string(),
        }
    }
}

/// Strip surrounding whitespace from a free-text field
///
/// Applying it twice gives the same result as applying it once.
pub fn normalize_text(s: &str) -> String {
    s.trim().to_string()
}

/// Reads typed fields out of a JSON object, accumulating violations.
///
/// Accessors return a placeholder when a field is invalid; the placeholder is
/// never observable because [`FieldReader::finish`] fails whenever one was
/// produced.
pub struct FieldReader<'a> {
    fields: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> FieldReader<'a> {
    /// Start reading `value`, which must be a JSON object
    pub fn new(value: &'a Value) -> Result<Self, ValidationErrors> {
        match value.as_object() {
            Some(fields) => Ok(Self {
                fields,
                errors: ValidationErrors::new(),
            }),
            None => Err(ValidationErrors::single(
                BODY_FIELD,
                "Input should be a valid JSON object",
            )),
        }
    }

    fn required(&mut self, field: &str) -> Option<&'a Value> {
        let fields: &'a Map<String, Value> = self.fields;
        match fields.get(field) {
            Some(Value::Null) | None => {
                self.errors.push(FieldViolation::new(field, "Field required"));
                None
            }
            Some(v) => Some(v),
        }
    }

    /// Read a required integer field and check it against `bounds`.
    ///
    /// Floats with no fractional part and strings holding an integer are accepted;
    /// booleans are not.
    pub fn integer(&mut self, field: &str, bounds: Bounds) -> i64 {
        let Some(value) = self.required(field) else {
            return 0;
        };
        let parsed = match value {
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => value.as_i64().or_else(|| {
                value
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            }),
        };
        match parsed {
            Some(n) => {
                if let Some(message) = bounds.check(n) {
                    self.errors.push(FieldViolation::new(field, message));
                }
                n
            }
            None => {
                self.errors
                    .push(FieldViolation::new(field, "Input should be a valid integer"));
                0
            }
        }
    }

    /// Read a required free-text field, trimmed
    pub fn text(&mut self, field: &str) -> String {
        match self.required(field) {
            Some(Value::String(s)) => normalize_text(s),
            Some(_) => {
                self.errors
                    .push(FieldViolation::new(field, "Input should be a valid string"));
                String::new()
            }
            None => String::new(),
        }
    }

    /// Read a required enumerated field, matched exactly
    pub fn choice<T: Choice>(&mut self, field: &str) -> T {
        let fallback = T::VARIANTS[0].1;
        let raw = match self.required(field) {
            Some(Value::String(s)) => s,
            Some(_) => {
                self.errors
                    .push(FieldViolation::new(field, "Input should be a valid string"));
                return fallback;
            }
            None => return fallback,
        };
        match T::parse(raw) {
            Some(v) => v,
            None => {
                self.errors.push(FieldViolation::new(field, T::expected()));
                fallback
            }
        }
    }

    /// Succeed only if no field was rejected
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
