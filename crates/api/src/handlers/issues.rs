//! Handlers for project issues.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ivv_core::types::DbId;
use ivv_db::models::issue::Issue;
use ivv_workflow::inputs::{IssuePatch, NewIssueInput};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/issues
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Issue>>>> {
    let issues = state
        .engine
        .list_project_issues(&auth.actor, project_id)
        .await?;
    Ok(Json(DataResponse::new(issues)))
}

/// POST /api/v1/projects/{project_id}/issues
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<NewIssueInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Issue>>)> {
    input.project_id = project_id;
    let issue = state.engine.create_issue(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(issue))))
}

/// GET /api/v1/issues/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Issue>>> {
    let issue = state.engine.get_issue(&auth.actor, id).await?;
    Ok(Json(DataResponse::new(issue)))
}

/// PUT /api/v1/issues/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<IssuePatch>,
) -> AppResult<Json<DataResponse<Issue>>> {
    let issue = state.engine.edit_issue(&auth.actor, id, patch).await?;
    Ok(Json(DataResponse::new(issue)))
}

/// DELETE /api/v1/issues/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_issue(&auth.actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
