use ivv_core::authz::{require_project_editable, require_role};
use ivv_core::roles::{Actor, Role};
use ivv_core::types::DbId;
use ivv_db::models::event::{CreateEvent, Event, UpdateEvent};

use super::{not_found, ProjectWorkflowEngine};
use crate::error::WorkflowResult;
use crate::inputs::{check_event_fields, EventPatch, NewEventInput};

impl ProjectWorkflowEngine {
    pub async fn list_project_events(
        &self,
        actor: &Actor,
        project_id: DbId,
    ) -> WorkflowResult<Vec<Event>> {
        self.load_visible_project(actor, project_id).await?;
        Ok(self.store.list_events_by_project(project_id).await?)
    }

    pub async fn get_event(&self, actor: &Actor, id: DbId) -> WorkflowResult<Event> {
        let event = self
            .store
            .find_event(id)
            .await?
            .ok_or_else(|| not_found("Event", id))?;
        self.load_visible_project(actor, event.project_id).await?;
        Ok(event)
    }

    /// Add a schedule event to a project that is not yet approved. Vendors only.
    pub async fn create_event(&self, actor: &Actor, input: NewEventInput) -> WorkflowResult<Event> {
        require_role(actor, &[Role::Vendor])?;
        let project = self.load_project(input.project_id).await?;
        require_project_editable(project.status)?;
        check_event_fields(
            &input.name,
            &input.description,
            (input.planned_start, input.planned_end),
            (input.actual_start, input.actual_end),
        )?;

        let event = self
            .store
            .create_event(&CreateEvent {
                project_id: project.id,
                name: input.name.trim().to_string(),
                description: input.description,
                planned_start: input.planned_start,
                planned_end: input.planned_end,
                completed: input.completed,
                actual_start: input.actual_start,
                actual_end: input.actual_end,
            })
            .await?;

        tracing::info!(
            actor_id = actor.id,
            project_id = project.id,
            event_id = event.id,
            "Event created",
        );
        Ok(event)
    }

    /// Edit an event while its project is not approved. Vendors only.
    ///
    /// The patch is merged onto the stored event before the date rules are
    /// checked, so moving one end of a range is validated against the other.
    pub async fn edit_event(
        &self,
        actor: &Actor,
        id: DbId,
        patch: EventPatch,
    ) -> WorkflowResult<Event> {
        require_role(actor, &[Role::Vendor])?;
        let current = self
            .store
            .find_event(id)
            .await?
            .ok_or_else(|| not_found("Event", id))?;
        let project = self.load_project(current.project_id).await?;
        require_project_editable(project.status)?;

        let update = UpdateEvent {
            name: patch
                .name
                .map(|n| n.trim().to_string())
                .unwrap_or(current.name),
            description: patch.description.unwrap_or(current.description),
            planned_start: patch.planned_start.unwrap_or(current.planned_start),
            planned_end: patch.planned_end.unwrap_or(current.planned_end),
            completed: patch.completed.unwrap_or(current.completed),
            actual_start: patch.actual_start.or(current.actual_start),
            actual_end: patch.actual_end.or(current.actual_end),
        };
        check_event_fields(
            &update.name,
            &update.description,
            (update.planned_start, update.planned_end),
            (update.actual_start, update.actual_end),
        )?;

        let event = self
            .store
            .update_event(id, &update)
            .await?
            .ok_or_else(|| not_found("Event", id))?;

        tracing::info!(actor_id = actor.id, event_id = id, "Event updated");
        Ok(event)
    }

    /// Delete an event. Any authenticated actor may.
    pub async fn delete_event(&self, actor: &Actor, id: DbId) -> WorkflowResult<()> {
        if !self.store.delete_event(id).await? {
            return Err(not_found("Event", id));
        }
        tracing::info!(actor_id = actor.id, event_id = id, "Event deleted");
        Ok(())
    }
}
