//! Project entity model and DTOs.

use ivv_core::review::ReviewStatus;
use ivv_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub original_contract_award_cents: Cents,
    pub creator_id: DbId,
    #[sqlx(rename = "status_id", try_from = "i16")]
    pub status: ReviewStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new project. Status always starts as PENDING.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub description: String,
    pub original_contract_award_cents: Cents,
    pub creator_id: DbId,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub description: Option<String>,
    pub original_contract_award_cents: Option<Cents>,
}

/// Number of child rows removed alongside a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeCounts {
    pub reports: u64,
    pub issues: u64,
    pub events: u64,
    pub comments: u64,
}
