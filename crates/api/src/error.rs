use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ivv_core::error::{CoreError, FieldError};
use ivv_workflow::{StoreError, WorkflowError};

/// Application-level error type for HTTP handlers.
///
/// Wraps domain errors from `ivv_core` and persistence errors from the
/// workflow store, and maps each variant to an HTTP status code with a JSON
/// error body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Core(e) => AppError::Core(e),
            WorkflowError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotAuthenticated => (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    core.to_string(),
                    None,
                ),
                CoreError::PermissionDenied(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::ProjectLocked(msg) => {
                    (StatusCode::CONFLICT, "PROJECT_LOCKED", msg.clone(), None)
                }
                CoreError::NotFound { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string(), None)
                }
                CoreError::DuplicateReportPeriod { .. } => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_REPORT_PERIOD",
                    core.to_string(),
                    None,
                ),
                CoreError::InvalidTransition { .. } => (
                    StatusCode::CONFLICT,
                    "INVALID_TRANSITION",
                    core.to_string(),
                    None,
                ),
                CoreError::Validation(errors) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    core.to_string(),
                    Some(errors.clone()),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },
            AppError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                internal()
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                internal()
            }
        };

        let mut body = serde_json::json!({
            "error": message,
            "code": code,
        });
        if let Some(fields) = fields {
            body["fields"] = serde_json::json!(fields);
        }

        (status, Json(body)).into_response()
    }
}

/// Details of internal failures stay in the logs.
fn internal() -> (StatusCode, &'static str, String, Option<Vec<FieldError>>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
        None,
    )
}

/// Convenience alias used by handler return types.
pub type AppResult<T> = Result<T, AppError>;
