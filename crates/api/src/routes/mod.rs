pub mod admin;
pub mod auth;
pub mod comments;
pub mod events;
pub mod health;
pub mod issues;
pub mod projects;
pub mod reports;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth
///     /login                                        login (POST)
///     /me                                           current user (GET)
///     /password                                     change own password (PUT)
///
/// /projects                                         list, create
///     /{id}                                         get, update, delete
///     /{id}/detail                                  project with children
///     /{id}/status                                  status change (POST)
///     /{project_id}/reports                         list, create
///     /{project_id}/reports/exists                  period lookup (?year=&month=)
///     /{project_id}/issues                          list, create
///     /{project_id}/events                          list, create
///     /{project_id}/comments                        list, create
///
/// /reports                                          list visible reports
///     /{id}                                         get, update, delete
///     /{id}/status                                  status change (POST)
///
/// /issues/{id}                                      get, update, delete
/// /events/{id}                                      get, update, delete
/// /comments/{id}                                    get, update, delete
///
/// /admin/users                                      list, create (ETS)
///     /{id}                                         delete
///     /{id}/reset-password                          generate new password (POST)
///     /{id}/role                                    change role (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/projects", projects::router())
        .nest("/reports", reports::router())
        .nest("/issues", issues::router())
        .nest("/events", events::router())
        .nest("/comments", comments::router())
        .nest("/admin", admin::router())
}
