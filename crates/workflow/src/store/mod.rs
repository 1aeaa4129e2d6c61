//! Persistence seam for the engine.
//!
//! The engine only ever talks to a [`WorkflowStore`]. Operations that must
//! be atomic (status change plus audit comment, project cascade, user
//! deletion with reassignment) are single store calls so each
//! implementation can run them in one transaction.

use async_trait::async_trait;
use ivv_core::period::Month;
use ivv_core::review::ReviewStatus;
use ivv_core::roles::Role;
use ivv_core::types::DbId;
use ivv_db::models::comment::{Comment, CreateComment};
use ivv_db::models::event::{CreateEvent, Event, UpdateEvent};
use ivv_db::models::issue::{CreateIssue, Issue, UpdateIssue};
use ivv_db::models::project::{CascadeCounts, CreateProject, Project, UpdateProject};
use ivv_db::models::report::{CreateReport, Report, ReportSearch, UpdateReport};
use ivv_db::models::user::{CreateUser, ReassignedCounts, User};

use crate::error::StoreError;

pub mod memory;
pub mod postgres;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    // -- users --

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Every user except the sentinel.
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    async fn create_user(&self, input: &CreateUser) -> StoreResult<User>;
    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool>;
    async fn update_user_role(&self, id: DbId, role: Role) -> StoreResult<Option<User>>;
    /// Reassign everything the user owns to the sentinel, then delete the
    /// user. `None` if the user does not exist.
    async fn delete_user_reassigning(&self, id: DbId) -> StoreResult<Option<ReassignedCounts>>;

    // -- projects --

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>>;
    async fn list_projects(&self) -> StoreResult<Vec<Project>>;
    async fn list_projects_by_creator(&self, creator_id: DbId) -> StoreResult<Vec<Project>>;
    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project>;
    async fn update_project(&self, id: DbId, input: &UpdateProject)
        -> StoreResult<Option<Project>>;
    /// Delete a project and all of its children. `None` if it does not exist.
    async fn delete_project_cascade(&self, id: DbId) -> StoreResult<Option<CascadeCounts>>;
    /// Conditionally move a project from `expected` to `target` and append
    /// `audit`, all or nothing. `None` if the status was no longer `expected`.
    async fn transition_project_status(
        &self,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> StoreResult<Option<(Project, Comment)>>;

    // -- reports --

    async fn find_report(&self, id: DbId) -> StoreResult<Option<Report>>;
    async fn find_report_by_period(
        &self,
        project_id: DbId,
        year: i32,
        month: Month,
    ) -> StoreResult<Option<Report>>;
    async fn list_reports(&self) -> StoreResult<Vec<Report>>;
    async fn list_reports_by_creator(&self, creator_id: DbId) -> StoreResult<Vec<Report>>;
    async fn list_reports_by_project(&self, project_id: DbId) -> StoreResult<Vec<Report>>;
    /// The requested window of matching reports, newest period first, and
    /// the total number of matches.
    async fn search_reports(&self, search: &ReportSearch) -> StoreResult<(Vec<Report>, i64)>;
    /// Fails with [`StoreError::UniqueViolation`] on a duplicate period.
    async fn create_report(&self, input: &CreateReport) -> StoreResult<Report>;
    async fn update_report(&self, id: DbId, input: &UpdateReport) -> StoreResult<Option<Report>>;
    async fn delete_report(&self, id: DbId) -> StoreResult<bool>;
    /// Report counterpart of [`WorkflowStore::transition_project_status`].
    async fn transition_report_status(
        &self,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> StoreResult<Option<(Report, Comment)>>;

    // -- issues --

    async fn find_issue(&self, id: DbId) -> StoreResult<Option<Issue>>;
    async fn list_issues_by_project(&self, project_id: DbId) -> StoreResult<Vec<Issue>>;
    async fn create_issue(&self, input: &CreateIssue) -> StoreResult<Issue>;
    async fn update_issue(&self, id: DbId, input: &UpdateIssue) -> StoreResult<Option<Issue>>;
    async fn delete_issue(&self, id: DbId) -> StoreResult<bool>;

    // -- events --

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>>;
    async fn list_events_by_project(&self, project_id: DbId) -> StoreResult<Vec<Event>>;
    async fn create_event(&self, input: &CreateEvent) -> StoreResult<Event>;
    async fn update_event(&self, id: DbId, input: &UpdateEvent) -> StoreResult<Option<Event>>;
    async fn delete_event(&self, id: DbId) -> StoreResult<bool>;

    // -- comments --

    async fn find_comment(&self, id: DbId) -> StoreResult<Option<Comment>>;
    async fn list_comments_by_project(&self, project_id: DbId) -> StoreResult<Vec<Comment>>;
    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment>;
    async fn update_comment(&self, id: DbId, content: &str) -> StoreResult<Option<Comment>>;
    async fn delete_comment(&self, id: DbId) -> StoreResult<bool>;
}
