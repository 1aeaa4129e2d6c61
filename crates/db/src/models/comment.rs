//! Comment entity model and DTOs.

use ivv_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A comment row from the `comments` table.
///
/// Comments double as the audit trail: status transitions append one
/// authored by the acting user.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub project_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new comment.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateComment {
    pub project_id: DbId,
    pub author_id: DbId,
    pub content: String,
}
