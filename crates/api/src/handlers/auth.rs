//! Handlers for the `/auth` resource (login, current user, password change).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ivv_db::models::user::UserResponse;
use ivv_workflow::inputs::{ChangePasswordInput, LoginInput};
use serde::Serialize;

use crate::auth::jwt::generate_access_token;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
///
/// Unknown emails and wrong passwords are indistinguishable: both are 401.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let user = state
        .engine
        .authenticate(&input.email, &input.password)
        .await?;

    let access_token = generate_access_token(user.id, user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Failed to sign access token: {e}")))?;

    Ok(Json(DataResponse::new(AuthResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(&user),
    })))
}

/// GET /api/v1/auth/me
pub async fn me(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state.engine.current_user(&auth.actor).await?;
    Ok(Json(DataResponse::new(user)))
}

/// PUT /api/v1/auth/password
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordInput>,
) -> AppResult<StatusCode> {
    state.engine.change_password(&auth.actor, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
