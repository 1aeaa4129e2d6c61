//! Route definitions for the `/reports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /              -> list
/// GET    /search        -> search   (?term=&page=)
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// POST   /{id}/status   -> change_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list))
        .route("/search", get(reports::search))
        .route(
            "/{id}",
            get(reports::get_by_id)
                .put(reports::update)
                .delete(reports::delete),
        )
        .route("/{id}/status", post(reports::change_status))
}
