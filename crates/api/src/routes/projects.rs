//! Route definitions for the `/projects` resource.
//!
//! Also nests the project-scoped report, issue, event and comment
//! collections under `/projects/{project_id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{comments, events, issues, projects, reports};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                               -> list
/// POST   /                               -> create
/// GET    /{id}                           -> get_by_id
/// PUT    /{id}                           -> update
/// DELETE /{id}                           -> delete
/// GET    /{id}/detail                    -> detail
/// POST   /{id}/status                    -> change_status
///
/// GET    /{project_id}/reports           -> reports::list_by_project
/// POST   /{project_id}/reports           -> reports::create
/// GET    /{project_id}/reports/exists    -> reports::exists
/// GET    /{project_id}/issues            -> issues::list_by_project
/// POST   /{project_id}/issues            -> issues::create
/// GET    /{project_id}/events            -> events::list_by_project
/// POST   /{project_id}/events            -> events::create
/// GET    /{project_id}/comments          -> comments::list_by_project
/// POST   /{project_id}/comments          -> comments::create
/// ```
pub fn router() -> Router<AppState> {
    let children = Router::new()
        .route(
            "/reports",
            get(reports::list_by_project).post(reports::create),
        )
        .route("/reports/exists", get(reports::exists))
        .route("/issues", get(issues::list_by_project).post(issues::create))
        .route("/events", get(events::list_by_project).post(events::create))
        .route(
            "/comments",
            get(comments::list_by_project).post(comments::create),
        );

    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_by_id)
                .put(projects::update)
                .delete(projects::delete),
        )
        .route("/{id}/detail", get(projects::detail))
        .route("/{id}/status", post(projects::change_status))
        .nest("/{project_id}", children)
}
