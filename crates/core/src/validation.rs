//! Field validation helpers.
//!
//! Input DTOs derive [`validator::Validate`] for per-field rules; cross-field
//! rules (date ordering, blank strings after trimming) are collected with
//! [`FieldErrors`]. Both end up as [`CoreError::Validation`] naming every
//! offending field.

use validator::{Validate, ValidationErrors};

use crate::error::{CoreError, FieldError};
use crate::types::Cents;

/// Largest accepted contract award: 999,999,999 dollars.
pub const MAX_CONTRACT_AWARD_CENTS: Cents = 99_999_999_900;

/// Run the derived validator rules for `input`.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), CoreError> {
    input.validate().map_err(CoreError::from)
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", e.code)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        CoreError::Validation(fields)
    }
}

/// Accumulates field errors across several checks.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    /// Record `message` against `field` unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.push(field, message);
        }
    }

    /// Reject strings that are empty once trimmed.
    pub fn non_blank(&mut self, field: &str, value: &str) {
        self.check(!value.trim().is_empty(), field, "must not be blank");
    }

    /// Merge the outcome of another check, e.g. an enum parse.
    pub fn absorb<T>(&mut self, result: Result<T, CoreError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(CoreError::Validation(fields)) => {
                self.errors.extend(fields);
                None
            }
            Err(other) => {
                self.push("input", other.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), CoreError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "must be at least 3 characters"))]
        name: String,
        #[validate(range(min = 0.0, max = 100.0))]
        progress: f64,
    }

    #[test]
    fn derived_rules_become_field_errors() {
        let input = Sample {
            name: "ab".into(),
            progress: 120.0,
        };
        match validate_input(&input) {
            Err(CoreError::Validation(fields)) => {
                assert_eq!(fields.len(), 2);
                assert_eq!(fields[0].field, "name");
                assert_eq!(fields[0].message, "must be at least 3 characters");
                assert_eq!(fields[1].field, "progress");
                assert_eq!(fields[1].message, "failed 'range' check");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_input_passes() {
        let input = Sample {
            name: "abc".into(),
            progress: 100.0,
        };
        assert!(validate_input(&input).is_ok());
    }

    #[test]
    fn field_errors_accumulate() {
        let mut errors = FieldErrors::new();
        errors.non_blank("title", "   ");
        errors.check(false, "planned_end", "must not be before planned_start");
        errors.check(true, "name", "unused");
        match errors.into_result() {
            Err(CoreError::Validation(fields)) => {
                let names: Vec<&str> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["title", "planned_end"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn absorb_collects_parse_failures() {
        let mut errors = FieldErrors::new();
        let parsed = errors.absorb(crate::issue::Severity::parse("extreme"));
        assert!(parsed.is_none());
        assert!(!errors.is_empty());
    }
}
