//! Handlers for `/admin/users`. ETS only; the engine enforces the role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use ivv_core::roles::Role;
use ivv_core::types::DbId;
use ivv_db::models::user::UserResponse;
use ivv_workflow::inputs::{NewUserInput, RoleChangeInput};
use ivv_workflow::CreatedUser;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of a password reset: the new one-time password, shown once.
#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub user_id: DbId,
    pub generated_password: String,
}

/// GET /api/v1/admin/users
pub async fn list_users(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = state.engine.list_users(&auth.actor).await?;
    Ok(Json(DataResponse::new(users)))
}

/// POST /api/v1/admin/users
pub async fn create_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NewUserInput>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedUser>>)> {
    let created = state.engine.create_user(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// DELETE /api/v1/admin/users/{id}
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_user(&auth.actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
pub async fn reset_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ResetPasswordResponse>>> {
    let generated_password = state.engine.reset_password(&auth.actor, id).await?;
    Ok(Json(DataResponse::new(ResetPasswordResponse {
        user_id: id,
        generated_password,
    })))
}

/// PUT /api/v1/admin/users/{id}/role
pub async fn change_role(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<RoleChangeInput>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let role = Role::parse(&input.role)?;
    let user = state.engine.change_user_role(&auth.actor, id, role).await?;
    Ok(Json(DataResponse::new(user)))
}
