//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ivv_core::review::ReviewStatus;
use ivv_core::types::DbId;
use ivv_db::models::project::Project;
use ivv_workflow::inputs::{NewProjectInput, ProjectPatch, StatusChangeInput};
use ivv_workflow::ProjectDetail;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects
///
/// ETS sees every project; a vendor sees only their own.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.engine.list_projects(&auth.actor).await?;
    Ok(Json(DataResponse::new(projects)))
}

/// POST /api/v1/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NewProjectInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    let project = state.engine.create_project(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(project))))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.engine.get_project(&auth.actor, id).await?;
    Ok(Json(DataResponse::new(project)))
}

/// GET /api/v1/projects/{id}/detail
pub async fn detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let detail = state.engine.project_detail(&auth.actor, id).await?;
    Ok(Json(DataResponse::new(detail)))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<ProjectPatch>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state.engine.edit_project(&auth.actor, id, patch).await?;
    Ok(Json(DataResponse::new(project)))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_project(&auth.actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{id}/status
pub async fn change_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeInput>,
) -> AppResult<Json<DataResponse<Project>>> {
    let target = ReviewStatus::parse(&input.status)?;
    let project = state
        .engine
        .change_project_status(&auth.actor, id, target)
        .await?;
    Ok(Json(DataResponse::new(project)))
}
