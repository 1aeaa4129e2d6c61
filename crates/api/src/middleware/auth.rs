//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use ivv_core::error::CoreError;
use ivv_core::roles::Actor;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The acting user, resolved from a `Bearer` token in the `Authorization`
/// header.
///
/// The token only identifies the user; the role is re-read from the store on
/// every request so role changes and deletions take effect immediately.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub actor: Actor,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Core(CoreError::NotAuthenticated))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Core(CoreError::NotAuthenticated))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| AppError::Core(CoreError::NotAuthenticated))?;

        let actor = state.engine.resolve_actor(claims.sub).await?;
        Ok(AuthUser { actor })
    }
}
