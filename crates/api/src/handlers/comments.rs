//! Handlers for project comments.
//!
//! Audit comments written by status changes come back from the same
//! listing as hand-written ones.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ivv_core::types::DbId;
use ivv_db::models::comment::Comment;
use ivv_workflow::inputs::{CommentContentInput, NewCommentInput};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/projects/{project_id}/comments
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    let comments = state
        .engine
        .list_project_comments(&auth.actor, project_id)
        .await?;
    Ok(Json(DataResponse::new(comments)))
}

/// POST /api/v1/projects/{project_id}/comments
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<NewCommentInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    input.project_id = project_id;
    let comment = state.engine.add_comment(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(comment))))
}

/// GET /api/v1/comments/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Comment>>> {
    let comment = state.engine.get_comment(&auth.actor, id).await?;
    Ok(Json(DataResponse::new(comment)))
}

/// PUT /api/v1/comments/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CommentContentInput>,
) -> AppResult<Json<DataResponse<Comment>>> {
    let comment = state
        .engine
        .edit_comment(&auth.actor, id, &input.content)
        .await?;
    Ok(Json(DataResponse::new(comment)))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_comment(&auth.actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
