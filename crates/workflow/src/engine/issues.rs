use ivv_core::authz::{require_project_editable, require_role};
use ivv_core::roles::{Actor, Role};
use ivv_core::types::DbId;
use ivv_db::models::issue::{CreateIssue, Issue, UpdateIssue};

use super::{not_found, ProjectWorkflowEngine};
use crate::error::WorkflowResult;
use crate::inputs::{IssuePatch, NewIssueInput};

impl ProjectWorkflowEngine {
    pub async fn list_project_issues(
        &self,
        actor: &Actor,
        project_id: DbId,
    ) -> WorkflowResult<Vec<Issue>> {
        self.load_visible_project(actor, project_id).await?;
        Ok(self.store.list_issues_by_project(project_id).await?)
    }

    pub async fn get_issue(&self, actor: &Actor, id: DbId) -> WorkflowResult<Issue> {
        let issue = self
            .store
            .find_issue(id)
            .await?
            .ok_or_else(|| not_found("Issue", id))?;
        self.load_visible_project(actor, issue.project_id).await?;
        Ok(issue)
    }

    /// Raise an issue on a project that is not yet approved. Vendors only.
    pub async fn create_issue(&self, actor: &Actor, input: NewIssueInput) -> WorkflowResult<Issue> {
        require_role(actor, &[Role::Vendor])?;
        let project = self.load_project(input.project_id).await?;
        require_project_editable(project.status)?;
        let levels = input.check()?;

        let issue = self
            .store
            .create_issue(&CreateIssue {
                project_id: project.id,
                creator_id: actor.id,
                title: input.title.trim().to_string(),
                description: input.description,
                remedy: input.remedy,
                severity: levels.severity,
                likelihood: levels.likelihood,
                status: levels.status,
            })
            .await?;

        tracing::info!(
            actor_id = actor.id,
            project_id = project.id,
            issue_id = issue.id,
            severity = %issue.severity,
            "Issue created",
        );
        Ok(issue)
    }

    /// Edit an issue while its project is not approved. Vendors only.
    pub async fn edit_issue(
        &self,
        actor: &Actor,
        id: DbId,
        patch: IssuePatch,
    ) -> WorkflowResult<Issue> {
        require_role(actor, &[Role::Vendor])?;
        let issue = self
            .store
            .find_issue(id)
            .await?
            .ok_or_else(|| not_found("Issue", id))?;
        let project = self.load_project(issue.project_id).await?;
        require_project_editable(project.status)?;
        let levels = patch.check()?;

        let update = UpdateIssue {
            title: patch.title.map(|t| t.trim().to_string()),
            description: patch.description,
            remedy: patch.remedy,
            severity: levels.severity,
            likelihood: levels.likelihood,
            status: levels.status,
        };
        let issue = self
            .store
            .update_issue(id, &update)
            .await?
            .ok_or_else(|| not_found("Issue", id))?;

        tracing::info!(
            actor_id = actor.id,
            issue_id = id,
            status = %issue.status,
            "Issue updated",
        );
        Ok(issue)
    }

    /// Delete an issue. Any authenticated actor may.
    pub async fn delete_issue(&self, actor: &Actor, id: DbId) -> WorkflowResult<()> {
        if !self.store.delete_issue(id).await? {
            return Err(not_found("Issue", id));
        }
        tracing::info!(actor_id = actor.id, issue_id = id, "Issue deleted");
        Ok(())
    }
}
