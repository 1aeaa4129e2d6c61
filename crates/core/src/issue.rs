//! Issue classification enums.
//!
//! Severity and likelihood share the `issue_levels` lookup table; issue status
//! uses `issue_statuses`.

use crate::lookup::define_lookup_enum;

define_lookup_enum! {
    /// How bad the consequences of an issue would be.
    Severity (field = "severity") {
        Low = 1 => "LOW",
        Medium = 2 => "MEDIUM",
        High = 3 => "HIGH",
    }
}

define_lookup_enum! {
    /// How likely an issue is to materialize.
    Likelihood (field = "likelihood") {
        Low = 1 => "LOW",
        Medium = 2 => "MEDIUM",
        High = 3 => "HIGH",
    }
}

define_lookup_enum! {
    /// Whether an issue still needs attention.
    IssueStatus (field = "status") {
        Open = 1 => "OPEN",
        Closed = 2 => "CLOSED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn lowercase_labels_map_to_variants() {
        assert_eq!(Severity::parse("low").unwrap(), Severity::Low);
        assert_eq!(Severity::parse("medium").unwrap(), Severity::Medium);
        assert_eq!(Likelihood::parse("HIGH").unwrap(), Likelihood::High);
        assert_eq!(IssueStatus::parse("closed").unwrap(), IssueStatus::Closed);
    }

    #[test]
    fn unrecognized_severity_does_not_default_to_high() {
        let err = Severity::parse("critical").unwrap_err();
        match err {
            CoreError::Validation(fields) => assert_eq!(fields[0].field, "severity"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn empty_likelihood_is_rejected() {
        assert!(Likelihood::parse("").is_err());
    }

    #[test]
    fn decode_from_lookup_id() {
        assert_eq!(Severity::try_from(3), Ok(Severity::High));
        let err = IssueStatus::try_from(9).unwrap_err();
        assert_eq!(err.to_string(), "Unknown IssueStatus id 9");
    }
}
