//! Schedule event (milestone) model and DTOs.

use ivv_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An event row from the `events` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub planned_start: Timestamp,
    pub planned_end: Timestamp,
    pub completed: bool,
    pub actual_start: Option<Timestamp>,
    pub actual_end: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new event.
#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub planned_start: Timestamp,
    pub planned_end: Timestamp,
    pub completed: bool,
    pub actual_start: Option<Timestamp>,
    pub actual_end: Option<Timestamp>,
}

/// DTO for replacing the editable fields of an event.
///
/// The caller merges a partial patch with the stored row first so that the
/// date-ordering rules can be checked on the final values.
#[derive(Debug, Clone)]
pub struct UpdateEvent {
    pub name: String,
    pub description: String,
    pub planned_start: Timestamp,
    pub planned_end: Timestamp,
    pub completed: bool,
    pub actual_start: Option<Timestamp>,
    pub actual_end: Option<Timestamp>,
}
