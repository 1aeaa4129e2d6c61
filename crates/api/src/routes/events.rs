//! Route definitions for the `/events` resource.
//!
//! Creation and listing live under `/projects/{project_id}/events`.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(events::get_by_id).put(events::update).delete(events::delete),
    )
}
