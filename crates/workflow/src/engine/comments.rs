use ivv_core::authz::require_owner_or_role;
use ivv_core::roles::{Actor, Role};
use ivv_core::types::DbId;
use ivv_db::models::comment::{Comment, CreateComment};

use super::{not_found, ProjectWorkflowEngine};
use crate::error::WorkflowResult;
use crate::inputs::{check_comment_content, NewCommentInput};

impl ProjectWorkflowEngine {
    /// A project's comments in conversation order, audit entries included.
    pub async fn list_project_comments(
        &self,
        actor: &Actor,
        project_id: DbId,
    ) -> WorkflowResult<Vec<Comment>> {
        self.load_visible_project(actor, project_id).await?;
        Ok(self.store.list_comments_by_project(project_id).await?)
    }

    pub async fn get_comment(&self, actor: &Actor, id: DbId) -> WorkflowResult<Comment> {
        let comment = self.load_comment(id).await?;
        self.load_visible_project(actor, comment.project_id).await?;
        Ok(comment)
    }

    /// Post a comment on a project. ETS may comment anywhere, a vendor only on
    /// projects they can read.
    pub async fn add_comment(
        &self,
        actor: &Actor,
        input: NewCommentInput,
    ) -> WorkflowResult<Comment> {
        let project = self.load_visible_project(actor, input.project_id).await?;
        check_comment_content(&input.content)?;

        let comment = self
            .store
            .create_comment(&CreateComment {
                project_id: project.id,
                author_id: actor.id,
                content: input.content.trim().to_string(),
            })
            .await?;

        tracing::info!(
            actor_id = actor.id,
            project_id = project.id,
            comment_id = comment.id,
            "Comment added",
        );
        Ok(comment)
    }

    /// Replace a comment's text. The author or any ETS user may.
    pub async fn edit_comment(
        &self,
        actor: &Actor,
        id: DbId,
        content: &str,
    ) -> WorkflowResult<Comment> {
        let comment = self.load_comment(id).await?;
        require_owner_or_role(actor, comment.author_id, &[Role::Ets])?;
        check_comment_content(content)?;

        let comment = self
            .store
            .update_comment(id, content.trim())
            .await?
            .ok_or_else(|| not_found("Comment", id))?;

        tracing::info!(actor_id = actor.id, comment_id = id, "Comment updated");
        Ok(comment)
    }

    /// Delete a comment. The author or any ETS user may.
    pub async fn delete_comment(&self, actor: &Actor, id: DbId) -> WorkflowResult<()> {
        let comment = self.load_comment(id).await?;
        require_owner_or_role(actor, comment.author_id, &[Role::Ets])?;

        if !self.store.delete_comment(id).await? {
            return Err(not_found("Comment", id));
        }
        tracing::info!(actor_id = actor.id, comment_id = id, "Comment deleted");
        Ok(())
    }

    async fn load_comment(&self, id: DbId) -> WorkflowResult<Comment> {
        self.store
            .find_comment(id)
            .await?
            .ok_or_else(|| not_found("Comment", id))
    }
}
