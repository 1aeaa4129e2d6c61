//! Handlers for project schedule events.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ivv_core::types::DbId;
use ivv_db::models::event::Event;
use ivv_workflow::inputs::{EventPatch, NewEventInput};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/events
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Event>>>> {
    let events = state
        .engine
        .list_project_events(&auth.actor, project_id)
        .await?;
    Ok(Json(DataResponse::new(events)))
}

/// POST /api/v1/projects/{project_id}/events
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<NewEventInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Event>>)> {
    input.project_id = project_id;
    let event = state.engine.create_event(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(event))))
}

/// GET /api/v1/events/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = state.engine.get_event(&auth.actor, id).await?;
    Ok(Json(DataResponse::new(event)))
}

/// PUT /api/v1/events/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<EventPatch>,
) -> AppResult<Json<DataResponse<Event>>> {
    let event = state.engine.edit_event(&auth.actor, id, patch).await?;
    Ok(Json(DataResponse::new(event)))
}

/// DELETE /api/v1/events/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_event(&auth.actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
