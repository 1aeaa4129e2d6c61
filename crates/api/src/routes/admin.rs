//! Route definitions for user administration.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /users                        -> list_users
/// POST   /users                        -> create_user
/// DELETE /users/{id}                   -> delete_user
/// POST   /users/{id}/reset-password    -> reset_password
/// PUT    /users/{id}/role              -> change_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/users/{id}/reset-password", post(admin::reset_password))
        .route("/users/{id}/role", put(admin::change_role))
}
