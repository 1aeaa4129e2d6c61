//! Route definitions for the `/issues` resource.
//!
//! Creation and listing live under `/projects/{project_id}/issues`.

use axum::routing::get;
use axum::Router;

use crate::handlers::issues;
use crate::state::AppState;

/// Routes mounted at `/issues`.
///
/// ```text
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(issues::get_by_id).put(issues::update).delete(issues::delete),
    )
}
