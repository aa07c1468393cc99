//! Field validation for patient records.
//!
//! Validation never stops at the first problem: every constraint is checked and each failure
//! is recorded as a [`FieldViolation`], so a caller sees the complete list in one response.

use crate::constants::{MAX_AGE_EXCLUSIVE, MIN_AGE_EXCLUSIVE};
use crate::patient::Gender;
use pms_types::NonEmptyText;

/// A single violated constraint on a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    field: &'static str,
    message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A patient field set failed validation.
///
/// Always holds at least one violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", join_violations(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Returns true if any violation was recorded against `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects violations while individual fields are checked.
///
/// Each check returns the validated value, or `None` after recording why it was rejected.
#[derive(Debug, Default)]
pub(crate) struct Violations(Vec<FieldViolation>);

impl Violations {
    pub(crate) fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    pub(crate) fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, "field required");
        }
        value
    }

    pub(crate) fn text(&mut self, field: &'static str, value: Option<String>) -> Option<NonEmptyText> {
        let value = self.required(field, value)?;
        match NonEmptyText::new(value) {
            Ok(text) => Some(text),
            Err(e) => {
                self.push(field, e.to_string());
                None
            }
        }
    }

    pub(crate) fn age(&mut self, value: Option<i64>) -> Option<u8> {
        let value = self.required("age", value)?;
        if value <= MIN_AGE_EXCLUSIVE || value >= MAX_AGE_EXCLUSIVE {
            self.push(
                "age",
                format!(
                    "must be greater than {MIN_AGE_EXCLUSIVE} and less than {MAX_AGE_EXCLUSIVE}"
                ),
            );
            return None;
        }
        u8::try_from(value).ok()
    }

    pub(crate) fn gender(&mut self, value: Option<String>) -> Option<Gender> {
        let value = self.required("gender", value)?;
        let gender = Gender::from_wire(&value);
        if gender.is_none() {
            self.push("gender", "must be one of 'male', 'female', 'others'");
        }
        gender
    }

    pub(crate) fn positive(&mut self, field: &'static str, value: Option<f64>) -> Option<f64> {
        let value = self.required(field, value)?;
        if !value.is_finite() || value <= 0.0 {
            self.push(field, "must be a finite number greater than 0");
            return None;
        }
        Some(value)
    }

    pub(crate) fn into_error(self) -> ValidationError {
        ValidationError { violations: self.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_bounds_are_exclusive() {
        let mut v = Violations::default();
        assert_eq!(v.age(Some(0)), None);
        assert_eq!(v.age(Some(120)), None);
        assert_eq!(v.age(Some(-3)), None);
        assert_eq!(v.age(Some(1)), Some(1));
        assert_eq!(v.age(Some(119)), Some(119));

        let err = v.into_error();
        assert_eq!(err.violations().len(), 3);
        assert!(err.violations().iter().all(|f| f.field() == "age"));
    }

    #[test]
    fn positive_rejects_zero_negative_and_non_finite() {
        let mut v = Violations::default();
        assert_eq!(v.positive("height", Some(0.0)), None);
        assert_eq!(v.positive("height", Some(-1.2)), None);
        assert_eq!(v.positive("height", Some(f64::NAN)), None);
        assert_eq!(v.positive("height", Some(f64::INFINITY)), None);
        assert_eq!(v.positive("height", Some(1.82)), Some(1.82));
        assert_eq!(v.into_error().violations().len(), 4);
    }

    #[test]
    fn missing_value_is_reported_as_required() {
        let mut v = Violations::default();
        assert!(v.text("name", None).is_none());
        assert!(v.gender(None).is_none());

        let err = v.into_error();
        assert_eq!(
            err.violations(),
            &[
                FieldViolation::new("name", "field required"),
                FieldViolation::new("gender", "field required"),
            ]
        );
    }

    #[test]
    fn gender_is_case_sensitive() {
        let mut v = Violations::default();
        assert_eq!(v.gender(Some("female".into())), Some(Gender::Female));
        assert_eq!(v.gender(Some("Female".into())), None);
        assert!(v.into_error().has_field("gender"));
    }

    #[test]
    fn display_lists_every_violation() {
        let mut v = Violations::default();
        v.push("age", "must be greater than 0 and less than 120");
        v.push("weight", "field required");

        assert_eq!(
            v.into_error().to_string(),
            "validation failed: age: must be greater than 0 and less than 120; weight: field required"
        );
    }
}
