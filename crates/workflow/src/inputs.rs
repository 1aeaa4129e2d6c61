//! Request payloads accepted by the engine.
//!
//! Per-field rules use the `validator` derive; enum labels arrive as strings
//! and are parsed by the closed enums' total mappings, so an unknown label is
//! a field error rather than a silent default. Parent ids marked
//! `#[serde(default)]` are filled in from the URL path by the HTTP layer.

use ivv_core::error::CoreError;
use ivv_core::issue::{IssueStatus, Likelihood, Severity};
use ivv_core::period::{validate_report_year, Month};
use ivv_core::roles::Role;
use ivv_core::types::{Cents, DbId, Timestamp};
use ivv_core::validation::{validate_input, FieldErrors, MAX_CONTRACT_AWARD_CENTS};
use serde::Deserialize;
use validator::Validate;

/// Largest accepted comment body, in characters.
pub const MAX_COMMENT_LENGTH: u64 = 5000;

fn check_award(errors: &mut FieldErrors, cents: Cents) {
    errors.check(
        (0..=MAX_CONTRACT_AWARD_CENTS).contains(&cents),
        "original_contract_award_cents",
        "must be between 0 and 999,999,999 dollars",
    );
}

/// Project names are measured after trimming.
fn check_project_name(errors: &mut FieldErrors, name: &str) {
    let len = name.trim().chars().count();
    errors.check(
        (3..=100).contains(&len),
        "name",
        "must be between 3 and 100 characters",
    );
}

/// Collect derive-level and cross-field errors into one validation failure.
fn finish(derived: Result<(), CoreError>, mut errors: FieldErrors) -> Result<(), CoreError> {
    errors.absorb(derived);
    errors.into_result()
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NewProjectInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub original_contract_award_cents: Cents,
}

impl NewProjectInput {
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        check_project_name(&mut errors, &self.name);
        check_award(&mut errors, self.original_contract_award_cents);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub original_contract_award_cents: Option<Cents>,
}

impl ProjectPatch {
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = FieldErrors::new();
        if let Some(name) = &self.name {
            check_project_name(&mut errors, name);
        }
        if let Some(cents) = self.original_contract_award_cents {
            check_award(&mut errors, cents);
        }
        errors.into_result()
    }
}

/// Body of a status change request, e.g. `{ "status": "APPROVED" }`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChangeInput {
    pub status: String,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// `month` accepts a name in any casing or a number `1..=12`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewReportInput {
    #[serde(default)]
    pub project_id: DbId,
    pub year: i32,
    pub month: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub paid_up_to_now_cents: Cents,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub progress: f64,
}

impl NewReportInput {
    /// Validate every field and resolve the month.
    pub fn check(&self) -> Result<Month, CoreError> {
        let mut errors = FieldErrors::new();
        errors.absorb(validate_report_year(self.year));
        let month = errors.absorb(Month::resolve(&self.month));
        finish(validate_input(self), errors)?;
        month.ok_or_else(|| CoreError::invalid_field("month", "is required"))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReportPatch {
    pub year: Option<i32>,
    pub month: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub paid_up_to_now_cents: Option<Cents>,
    #[validate(range(min = 0.0, max = 100.0, message = "must be between 0 and 100"))]
    pub progress: Option<f64>,
}

impl ReportPatch {
    /// Validate the given fields and resolve the month, if one was given.
    pub fn check(&self) -> Result<Option<Month>, CoreError> {
        let mut errors = FieldErrors::new();
        if let Some(year) = self.year {
            errors.absorb(validate_report_year(year));
        }
        let month = self
            .month
            .as_deref()
            .and_then(|m| errors.absorb(Month::resolve(m)));
        finish(validate_input(self), errors)?;
        Ok(month)
    }
}

/// Results per page of a report search.
pub const SEARCH_PAGE_SIZE: i64 = 9;

/// Shortest accepted search term, in characters after trimming.
pub const MIN_SEARCH_TERM_LENGTH: usize = 3;

fn first_page() -> i64 {
    1
}

/// Query of `GET /reports/search`. Pages count from 1.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSearchInput {
    #[serde(default)]
    pub term: String,
    #[serde(default = "first_page")]
    pub page: i64,
}

impl ReportSearchInput {
    /// Validate the query and return the trimmed term.
    pub fn check(&self) -> Result<&str, CoreError> {
        let term = self.term.trim();
        let mut errors = FieldErrors::new();
        errors.check(
            term.chars().count() >= MIN_SEARCH_TERM_LENGTH,
            "term",
            "must be at least 3 characters",
        );
        errors.check(self.page >= 1, "page", "must be at least 1");
        errors.into_result()?;
        Ok(term)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * SEARCH_PAGE_SIZE
    }
}

// ---------------------------------------------------------------------------
// Issues
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewIssueInput {
    #[serde(default)]
    pub project_id: DbId,
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: String,
    pub description: String,
    pub remedy: String,
    pub severity: String,
    pub likelihood: String,
    /// Defaults to `OPEN` when omitted.
    pub status: Option<String>,
}

/// Parsed, validated issue fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueLevels {
    pub severity: Severity,
    pub likelihood: Likelihood,
    pub status: IssueStatus,
}

impl NewIssueInput {
    pub fn check(&self) -> Result<IssueLevels, CoreError> {
        let mut errors = FieldErrors::new();
        errors.non_blank("title", &self.title);
        errors.non_blank("description", &self.description);
        errors.non_blank("remedy", &self.remedy);
        let severity = errors.absorb(Severity::parse(&self.severity));
        let likelihood = errors.absorb(Likelihood::parse(&self.likelihood));
        let status = match self.status.as_deref() {
            Some(s) => errors.absorb(IssueStatus::parse(s)),
            None => Some(IssueStatus::Open),
        };
        finish(validate_input(self), errors)?;
        match (severity, likelihood, status) {
            (Some(severity), Some(likelihood), Some(status)) => Ok(IssueLevels {
                severity,
                likelihood,
                status,
            }),
            _ => Err(CoreError::Internal("issue levels unresolved".into())),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct IssuePatch {
    #[validate(length(min = 1, max = 200, message = "must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub remedy: Option<String>,
    pub severity: Option<String>,
    pub likelihood: Option<String>,
    pub status: Option<String>,
}

/// Parsed optional issue levels from a patch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IssueLevelPatch {
    pub severity: Option<Severity>,
    pub likelihood: Option<Likelihood>,
    pub status: Option<IssueStatus>,
}

impl IssuePatch {
    pub fn check(&self) -> Result<IssueLevelPatch, CoreError> {
        let mut errors = FieldErrors::new();
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("remedy", &self.remedy),
        ] {
            if let Some(value) = value {
                errors.non_blank(field, value);
            }
        }
        let levels = IssueLevelPatch {
            severity: self
                .severity
                .as_deref()
                .and_then(|s| errors.absorb(Severity::parse(s))),
            likelihood: self
                .likelihood
                .as_deref()
                .and_then(|s| errors.absorb(Likelihood::parse(s))),
            status: self
                .status
                .as_deref()
                .and_then(|s| errors.absorb(IssueStatus::parse(s))),
        };
        finish(validate_input(self), errors)?;
        Ok(levels)
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NewEventInput {
    #[serde(default)]
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub planned_start: Timestamp,
    pub planned_end: Timestamp,
    #[serde(default)]
    pub completed: bool,
    pub actual_start: Option<Timestamp>,
    pub actual_end: Option<Timestamp>,
}

/// Partial event update. `actual_start`/`actual_end` can only be set, not
/// cleared, through a patch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub planned_start: Option<Timestamp>,
    pub planned_end: Option<Timestamp>,
    pub completed: Option<bool>,
    pub actual_start: Option<Timestamp>,
    pub actual_end: Option<Timestamp>,
}

/// Check the text fields and date ordering of a complete event.
pub fn check_event_fields(
    name: &str,
    description: &str,
    planned: (Timestamp, Timestamp),
    actual: (Option<Timestamp>, Option<Timestamp>),
) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    errors.non_blank("name", name);
    errors.non_blank("description", description);
    errors.check(
        planned.1 >= planned.0,
        "planned_end",
        "must not be before planned_start",
    );
    if let (Some(start), Some(end)) = actual {
        errors.check(end >= start, "actual_end", "must not be before actual_start");
    }
    errors.into_result()
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct NewCommentInput {
    #[serde(default)]
    pub project_id: DbId,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentContentInput {
    pub content: String,
}

/// Check a comment body: non-blank and at most [`MAX_COMMENT_LENGTH`] characters.
pub fn check_comment_content(content: &str) -> Result<(), CoreError> {
    let mut errors = FieldErrors::new();
    errors.non_blank("content", content);
    errors.check(
        content.chars().count() as u64 <= MAX_COMMENT_LENGTH,
        "content",
        "must be at most 5000 characters",
    );
    errors.into_result()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUserInput {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    pub last_name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub role: String,
}

impl NewUserInput {
    /// Validate every field and resolve the role.
    pub fn check(&self) -> Result<Role, CoreError> {
        let mut errors = FieldErrors::new();
        errors.non_blank("first_name", &self.first_name);
        errors.non_blank("last_name", &self.last_name);
        let role = errors.absorb(Role::parse(&self.role));
        finish(validate_input(self), errors)?;
        role.ok_or_else(|| CoreError::invalid_field("role", "is required"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleChangeInput {
    pub role: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    use super::*;

    fn field_names(err: CoreError) -> Vec<String> {
        match err {
            CoreError::Validation(fields) => fields.into_iter().map(|f| f.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn project_name_and_award_bounds() {
        let input = NewProjectInput {
            name: "ab".into(),
            description: String::new(),
            original_contract_award_cents: MAX_CONTRACT_AWARD_CENTS + 1,
        };
        let fields = field_names(input.check().unwrap_err());
        assert!(fields.contains(&"name".to_string()));
        assert!(fields.contains(&"original_contract_award_cents".to_string()));
    }

    #[test]
    fn project_name_is_measured_after_trimming() {
        for name in ["     ", "  ab  "] {
            let input = NewProjectInput {
                name: name.into(),
                description: String::new(),
                original_contract_award_cents: 0,
            };
            assert_eq!(field_names(input.check().unwrap_err()), vec!["name"]);
        }
        let patch = ProjectPatch {
            name: Some(" x ".into()),
            ..Default::default()
        };
        assert_eq!(field_names(patch.check().unwrap_err()), vec!["name"]);
        let padded = ProjectPatch {
            name: Some("  Portal  ".into()),
            ..Default::default()
        };
        assert!(padded.check().is_ok());
    }

    #[test]
    fn search_term_and_page_bounds() {
        let query = ReportSearchInput {
            term: "  por  ".into(),
            page: 3,
        };
        assert_eq!(query.check().unwrap(), "por");
        assert_eq!(query.offset(), 18);

        let bad = ReportSearchInput {
            term: " ab ".into(),
            page: 0,
        };
        assert_eq!(field_names(bad.check().unwrap_err()), vec!["term", "page"]);
    }

    #[test]
    fn report_month_accepts_name_or_number() {
        let mut input = NewReportInput {
            project_id: 1,
            year: 2024,
            month: "march".into(),
            paid_up_to_now_cents: 0,
            progress: 50.0,
        };
        assert_eq!(input.check().unwrap(), Month::March);
        input.month = "3".into();
        assert_eq!(input.check().unwrap(), Month::March);
    }

    #[test]
    fn report_rejects_bad_year_month_and_progress_together() {
        let input = NewReportInput {
            project_id: 1,
            year: 1999,
            month: "Smarch".into(),
            paid_up_to_now_cents: -1,
            progress: 101.0,
        };
        let fields = field_names(input.check().unwrap_err());
        for expected in ["year", "month", "paid_up_to_now_cents", "progress"] {
            assert!(fields.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn unknown_severity_is_a_field_error() {
        let input = NewIssueInput {
            project_id: 1,
            title: "Late".into(),
            description: "d".into(),
            remedy: "r".into(),
            severity: "CRITICAL".into(),
            likelihood: "low".into(),
            status: None,
        };
        assert_eq!(field_names(input.check().unwrap_err()), vec!["severity"]);
    }

    #[test]
    fn issue_status_defaults_to_open() {
        let input = NewIssueInput {
            project_id: 1,
            title: "Late".into(),
            description: "d".into(),
            remedy: "r".into(),
            severity: "high".into(),
            likelihood: "Medium".into(),
            status: None,
        };
        let levels = input.check().unwrap();
        assert_eq!(levels.status, IssueStatus::Open);
        assert_eq!(levels.severity, Severity::High);
        assert_eq!(levels.likelihood, Likelihood::Medium);
    }

    #[test]
    fn event_dates_must_be_ordered() {
        let now = Utc::now();
        let earlier = now - Duration::days(1);
        assert!(check_event_fields("Kickoff", "d", (earlier, now), (None, None)).is_ok());
        let fields = field_names(
            check_event_fields("Kickoff", "d", (now, earlier), (Some(now), Some(earlier)))
                .unwrap_err(),
        );
        assert_eq!(fields, vec!["planned_end", "actual_end"]);
    }

    #[test]
    fn comment_content_rules() {
        assert!(check_comment_content("Looks good").is_ok());
        assert_matches!(check_comment_content("   "), Err(CoreError::Validation(_)));
        assert!(check_comment_content(&"x".repeat(5001)).is_err());
    }

    #[test]
    fn user_email_must_be_valid() {
        let input = NewUserInput {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "not-an-email".into(),
            role: "ETS".into(),
        };
        assert_eq!(field_names(input.check().unwrap_err()), vec!["email"]);
    }

    #[test]
    fn user_names_must_not_be_blank() {
        let input = NewUserInput {
            first_name: "   ".into(),
            last_name: "  ".into(),
            email: "ada@example.com".into(),
            role: "ETS".into(),
        };
        assert_eq!(
            field_names(input.check().unwrap_err()),
            vec!["first_name", "last_name"]
        );
    }
}
