//! Monthly report entity model and DTOs.

use ivv_core::period::{report_display_name, Month};
use ivv_core::review::ReviewStatus;
use ivv_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A report row from the `reports` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Report {
    pub id: DbId,
    pub project_id: DbId,
    pub creator_id: DbId,
    pub year: i32,
    #[sqlx(try_from = "i16")]
    pub month: Month,
    pub paid_up_to_now_cents: Cents,
    pub progress: f64,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ReviewStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Report {
    /// e.g. `"January 2024 Report"`.
    pub fn display_name(&self) -> String {
        report_display_name(self.year, self.month)
    }
}

/// DTO for inserting a new report. Status always starts as PENDING.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReport {
    pub project_id: DbId,
    pub creator_id: DbId,
    pub year: i32,
    pub month: i16,
    pub paid_up_to_now_cents: Cents,
    pub progress: f64,
}

/// DTO for updating an existing report. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReport {
    pub year: Option<i32>,
    pub month: Option<i16>,
    pub paid_up_to_now_cents: Option<Cents>,
    pub progress: Option<f64>,
}

/// Filter and window for a report search.
///
/// `term` matches case-insensitively against the parent project's name and
/// the report period (`"January 2024"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSearch {
    pub term: String,
    /// Restrict to reports created by this user.
    pub creator_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
