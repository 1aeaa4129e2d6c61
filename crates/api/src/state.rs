use std::sync::Arc;

use ivv_workflow::ProjectWorkflowEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProjectWorkflowEngine>,
    pub config: Arc<ServerConfig>,
}
