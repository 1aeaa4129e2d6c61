//! Route definitions for the `/comments` resource.
//!
//! Creation and listing live under `/projects/{project_id}/comments`.

use axum::routing::get;
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(comments::get_by_id).put(comments::update).delete(comments::delete),
    )
}
