use ivv_core::authz::{require_owning_vendor, require_project_editable, require_role};
use ivv_core::error::CoreError;
use ivv_core::review::{plan_transition, ReviewStatus, Subject};
use ivv_core::roles::{Actor, Role};
use ivv_core::types::DbId;
use ivv_db::models::comment::CreateComment;
use ivv_db::models::project::{CreateProject, Project, UpdateProject};

use super::{not_found, ProjectDetail, ProjectWorkflowEngine};
use crate::error::WorkflowResult;
use crate::inputs::{NewProjectInput, ProjectPatch};

impl ProjectWorkflowEngine {
    /// ETS sees every project; a vendor sees the projects they created.
    pub async fn list_projects(&self, actor: &Actor) -> WorkflowResult<Vec<Project>> {
        let projects = match actor.role {
            Role::Ets => self.store.list_projects().await?,
            Role::Vendor => self.store.list_projects_by_creator(actor.id).await?,
        };
        Ok(projects)
    }

    pub async fn get_project(&self, actor: &Actor, id: DbId) -> WorkflowResult<Project> {
        self.load_visible_project(actor, id).await
    }

    /// The project with its reports, issues, events and comments.
    pub async fn project_detail(&self, actor: &Actor, id: DbId) -> WorkflowResult<ProjectDetail> {
        let project = self.load_visible_project(actor, id).await?;
        Ok(ProjectDetail {
            reports: self.store.list_reports_by_project(id).await?,
            issues: self.store.list_issues_by_project(id).await?,
            events: self.store.list_events_by_project(id).await?,
            comments: self.store.list_comments_by_project(id).await?,
            project,
        })
    }

    /// Create a PENDING project owned by the calling vendor.
    pub async fn create_project(
        &self,
        actor: &Actor,
        input: NewProjectInput,
    ) -> WorkflowResult<Project> {
        require_role(actor, &[Role::Vendor])?;
        input.check()?;

        let project = self
            .store
            .create_project(&CreateProject {
                name: input.name.trim().to_string(),
                description: input.description,
                original_contract_award_cents: input.original_contract_award_cents,
                creator_id: actor.id,
            })
            .await?;

        tracing::info!(actor_id = actor.id, project_id = project.id, "Project created");
        Ok(project)
    }

    /// Edit a project. Only its creator may, and only until it is approved.
    pub async fn edit_project(
        &self,
        actor: &Actor,
        id: DbId,
        patch: ProjectPatch,
    ) -> WorkflowResult<Project> {
        let project = self.load_project(id).await?;
        require_owning_vendor(actor, project.creator_id)?;
        require_project_editable(project.status)?;
        patch.check()?;

        let update = UpdateProject {
            name: patch.name.map(|n| n.trim().to_string()),
            description: patch.description,
            original_contract_award_cents: patch.original_contract_award_cents,
        };
        let project = self
            .store
            .update_project(id, &update)
            .await?
            .ok_or_else(|| not_found("Project", id))?;

        tracing::info!(actor_id = actor.id, project_id = id, "Project updated");
        Ok(project)
    }

    /// Delete a project and everything under it. ETS only.
    pub async fn delete_project(&self, actor: &Actor, id: DbId) -> WorkflowResult<()> {
        require_role(actor, &[Role::Ets])?;

        let counts = self
            .store
            .delete_project_cascade(id)
            .await?
            .ok_or_else(|| not_found("Project", id))?;

        tracing::info!(
            actor_id = actor.id,
            project_id = id,
            reports = counts.reports,
            issues = counts.issues,
            events = counts.events,
            comments = counts.comments,
            "Project deleted",
        );
        Ok(())
    }

    /// Move a project to `target`, recording the audit comment in the same
    /// store operation.
    pub async fn change_project_status(
        &self,
        actor: &Actor,
        id: DbId,
        target: ReviewStatus,
    ) -> WorkflowResult<Project> {
        let project = self.load_project(id).await?;

        let plan = plan_transition(
            actor,
            project.creator_id,
            project.status,
            target,
            Subject::Project,
        )
        .inspect_err(|e| {
            tracing::warn!(
                actor_id = actor.id,
                project_id = id,
                error = %e,
                "Project transition rejected",
            );
        })?;

        let audit = CreateComment {
            project_id: id,
            author_id: actor.id,
            content: plan.audit_comment,
        };
        let Some((project, comment)) = self
            .store
            .transition_project_status(id, plan.from, plan.to, &audit)
            .await?
        else {
            // Someone else moved it first.
            let current = self.load_project(id).await?.status;
            return Err(CoreError::InvalidTransition {
                from: current,
                to: target,
            }
            .into());
        };

        tracing::info!(
            actor_id = actor.id,
            project_id = id,
            from = %plan.from,
            to = %plan.to,
            comment_id = comment.id,
            "Project status changed",
        );
        Ok(project)
    }
}
