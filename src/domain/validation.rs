//! Field rules for untrusted input.
//!
//! Each rule is a plain function from a field name and value to an optional
//! [`FieldViolation`]. A record's rule set is an ordered array of these calls,
//! evaluated eagerly so every violation is reported, not just the first.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule")]
pub enum FieldViolation {
    #[serde(rename = "required")]
    RequiredFieldMissing { field: &'static str },

    #[serde(rename = "oneof")]
    InvalidEnumValue {
        field: &'static str,
        allowed: &'static [&'static str],
    },
}

impl FieldViolation {
    pub fn field(&self) -> &'static str {
        match self {
            FieldViolation::RequiredFieldMissing { field } => *field,
            FieldViolation::InvalidEnumValue { field, .. } => *field,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldViolation::RequiredFieldMissing { field } => {
                write!(f, "field '{}' failed on the 'required' rule", field)
            }
            FieldViolation::InvalidEnumValue { field, allowed } => write!(
                f,
                "field '{}' failed on the 'oneof' rule (allowed: {})",
                field,
                allowed.join(", ")
            ),
        }
    }
}

/// Every rule a record violated, in field-declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub violations: Vec<FieldViolation>,
}

impl ValidationErrors {
    /// Collapses the outcome of an ordered rule list into a result.
    pub fn from_checks<I>(checks: I) -> Result<(), ValidationErrors>
    where
        I: IntoIterator<Item = Option<FieldViolation>>,
    {
        let violations: Vec<FieldViolation> = checks.into_iter().flatten().collect();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { violations })
        }
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.violations.iter().map(FieldViolation::field).collect()
    }
}

impl From<FieldViolation> for ValidationErrors {
    fn from(violation: FieldViolation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn required_text(field: &'static str, value: &str) -> Option<FieldViolation> {
    value
        .is_empty()
        .then_some(FieldViolation::RequiredFieldMissing { field })
}

/// A numeric field is "present" only when it differs from zero, so a
/// legitimate zero is rejected as well.
pub fn required_amount(field: &'static str, value: f64) -> Option<FieldViolation> {
    (value == 0.0).then_some(FieldViolation::RequiredFieldMissing { field })
}

pub fn one_of(
    field: &'static str,
    value: &str,
    allowed: &'static [&'static str],
) -> Option<FieldViolation> {
    if value.is_empty() {
        return Some(FieldViolation::RequiredFieldMissing { field });
    }
    if !allowed.contains(&value) {
        return Some(FieldViolation::InvalidEnumValue { field, allowed });
    }
    None
}
