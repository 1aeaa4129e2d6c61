//! Issue entity model and DTOs.

use ivv_core::issue::{IssueStatus, Likelihood, Severity};
use ivv_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An issue row from the `issues` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Issue {
    pub id: DbId,
    pub project_id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
    pub remedy: String,
    #[sqlx(rename = "severity_id", try_from = "i16")]
    pub severity: Severity,
    #[sqlx(rename = "likelihood_id", try_from = "i16")]
    pub likelihood: Likelihood,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: IssueStatus,
    pub first_raised: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new issue.
#[derive(Debug, Clone)]
pub struct CreateIssue {
    pub project_id: DbId,
    pub creator_id: DbId,
    pub title: String,
    pub description: String,
    pub remedy: String,
    pub severity: Severity,
    pub likelihood: Likelihood,
    pub status: IssueStatus,
}

/// DTO for updating an existing issue. All fields are optional.
#[derive(Debug, Clone, Default)]
pub struct UpdateIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub remedy: Option<String>,
    pub severity: Option<Severity>,
    pub likelihood: Option<Likelihood>,
    pub status: Option<IssueStatus>,
}
