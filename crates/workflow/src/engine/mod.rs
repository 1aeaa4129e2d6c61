//! [`ProjectWorkflowEngine`]: authorization, validation and status
//! transitions for every mutation in the report center.
//!
//! Each operation takes the acting [`Actor`] explicitly and runs in the same
//! order: load what the decision depends on, check role and ownership, check
//! locks, validate input, then hand a single store call the work. Nothing is
//! written until every check has passed.
//!
//! Operations are grouped by resource:
//! - [`projects`] -- project CRUD, detail view, status changes
//! - [`reports`] -- monthly reports, period uniqueness, search, status changes
//! - [`issues`], [`events`] -- project children gated on the project lock
//! - [`comments`] -- discussion and audit trail
//! - [`users`] -- login, passwords, administration

use std::sync::Arc;

use ivv_core::error::CoreError;
use ivv_core::roles::Actor;
use ivv_core::types::DbId;
use ivv_db::models::comment::Comment;
use ivv_db::models::event::Event;
use ivv_db::models::issue::Issue;
use ivv_db::models::project::Project;
use ivv_db::models::report::Report;
use serde::Serialize;

use crate::error::WorkflowResult;
use crate::store::WorkflowStore;

pub mod comments;
pub mod events;
pub mod issues;
pub mod projects;
pub mod reports;
pub mod users;

/// Default length of generated one-time passwords.
pub const DEFAULT_GENERATED_PASSWORD_LENGTH: usize = 16;

/// Tunables for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub generated_password_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generated_password_length: DEFAULT_GENERATED_PASSWORD_LENGTH,
        }
    }
}

/// A project together with everything that hangs off it.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub project: Project,
    pub reports: Vec<Report>,
    pub issues: Vec<Issue>,
    pub events: Vec<Event>,
    pub comments: Vec<Comment>,
}

pub struct ProjectWorkflowEngine {
    store: Arc<dyn WorkflowStore>,
    config: EngineConfig,
}

impl ProjectWorkflowEngine {
    pub fn new(store: Arc<dyn WorkflowStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn WorkflowStore> {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Confirm the store is reachable.
    pub async fn health_check(&self) -> WorkflowResult<()> {
        Ok(self.store.health_check().await?)
    }

    // -- shared loaders --

    async fn load_project(&self, id: DbId) -> WorkflowResult<Project> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| not_found("Project", id))
    }

    async fn load_report(&self, id: DbId) -> WorkflowResult<Report> {
        self.store
            .find_report(id)
            .await?
            .ok_or_else(|| not_found("Report", id))
    }

    /// Load a project and fail unless `actor` may read it.
    async fn load_visible_project(&self, actor: &Actor, id: DbId) -> WorkflowResult<Project> {
        let project = self.load_project(id).await?;
        ivv_core::authz::require_visible(actor, project.creator_id)?;
        Ok(project)
    }
}

pub(crate) fn not_found(entity: &'static str, id: DbId) -> crate::error::WorkflowError {
    CoreError::NotFound { entity, id }.into()
}
