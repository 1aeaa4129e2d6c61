//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use ivv_api::error::AppError;
use ivv_core::error::{CoreError, FieldError};
use ivv_core::period::Month;
use ivv_core::review::ReviewStatus;
use ivv_workflow::{StoreError, WorkflowError};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_authenticated_returns_401() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NotAuthenticated)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn permission_denied_returns_403_with_reason() {
    let err = AppError::Core(CoreError::permission_denied("Only ETS may move a project to APPROVED"));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
    assert_eq!(json["error"], "Only ETS may move a project to APPROVED");
}

#[tokio::test]
async fn project_locked_returns_409() {
    let err = AppError::Core(CoreError::ProjectLocked(
        "Approved projects cannot be edited".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "PROJECT_LOCKED");
}

#[tokio::test]
async fn not_found_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Report",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Entity not found: Report with id 42");
}

#[tokio::test]
async fn duplicate_period_returns_409() {
    let err = AppError::Core(CoreError::DuplicateReportPeriod {
        project_id: 3,
        year: 2024,
        month: Month::May,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_REPORT_PERIOD");
    assert_eq!(json["error"], "Project 3 already has a report for MAY 2024");
}

#[tokio::test]
async fn invalid_transition_returns_409() {
    let err = AppError::Core(CoreError::InvalidTransition {
        from: ReviewStatus::Approved,
        to: ReviewStatus::Approved,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
    assert_eq!(
        json["error"],
        "Invalid status transition from APPROVED to APPROVED"
    );
}

#[tokio::test]
async fn validation_returns_400_with_fields() {
    let err = AppError::Core(CoreError::Validation(vec![FieldError {
        field: "progress".into(),
        message: "must be between 0 and 100".into(),
    }]));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["fields"][0]["field"], "progress");
    assert_eq!(json["fields"][0]["message"], "must be between 0 and 100");
}

#[tokio::test]
async fn store_failure_is_sanitized() {
    let err: AppError = WorkflowError::from(StoreError::Unavailable(
        "connection reset by peer at 10.0.0.7".into(),
    ))
    .into();

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
    assert!(json.get("fields").is_none());
}

#[tokio::test]
async fn core_internal_is_sanitized() {
    let err = AppError::Core(CoreError::Internal("argon2 params rejected".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn bad_request_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("malformed body".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "malformed body");
}
