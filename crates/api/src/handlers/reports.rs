//! Handlers for monthly reports.
//!
//! Reports are created and listed under `/projects/{project_id}/reports` and
//! addressed directly as `/reports/{id}` afterwards.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use ivv_core::period::Month;
use ivv_core::review::ReviewStatus;
use ivv_core::types::DbId;
use ivv_db::models::report::Report;
use ivv_workflow::inputs::{NewReportInput, ReportPatch, ReportSearchInput, StatusChangeInput};
use ivv_workflow::ReportPage;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the period lookup.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub year: i32,
    /// Month name (`"MARCH"`, any casing) or number (`"3"`).
    pub month: String,
}

/// GET /api/v1/reports
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    let reports = state.engine.list_reports(&auth.actor).await?;
    Ok(Json(DataResponse::new(reports)))
}

/// GET /api/v1/reports/search?term=&page=
///
/// Nine results per page, within the caller's visible reports.
pub async fn search(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ReportSearchInput>,
) -> AppResult<Json<DataResponse<ReportPage>>> {
    let page = state.engine.search_reports(&auth.actor, &query).await?;
    Ok(Json(DataResponse::new(page)))
}

/// GET /api/v1/projects/{project_id}/reports
pub async fn list_by_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Report>>>> {
    let reports = state
        .engine
        .list_project_reports(&auth.actor, project_id)
        .await?;
    Ok(Json(DataResponse::new(reports)))
}

/// POST /api/v1/projects/{project_id}/reports
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Json(mut input): Json<NewReportInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Report>>)> {
    input.project_id = project_id;
    let report = state.engine.create_report(&auth.actor, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(report))))
}

/// GET /api/v1/projects/{project_id}/reports/exists?year=&month=
///
/// Returns the report already covering the period, or `null`.
pub async fn exists(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<DataResponse<Option<Report>>>> {
    state.engine.get_project(&auth.actor, project_id).await?;
    let month = Month::resolve(&query.month)?;
    let existing = state
        .engine
        .report_already_exists(project_id, query.year, month)
        .await?;
    Ok(Json(DataResponse::new(existing)))
}

/// GET /api/v1/reports/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Report>>> {
    let report = state.engine.get_report(&auth.actor, id).await?;
    Ok(Json(DataResponse::new(report)))
}

/// PUT /api/v1/reports/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<ReportPatch>,
) -> AppResult<Json<DataResponse<Report>>> {
    let report = state.engine.edit_report(&auth.actor, id, patch).await?;
    Ok(Json(DataResponse::new(report)))
}

/// DELETE /api/v1/reports/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_report(&auth.actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/reports/{id}/status
pub async fn change_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<StatusChangeInput>,
) -> AppResult<Json<DataResponse<Report>>> {
    let target = ReviewStatus::parse(&input.status)?;
    let report = state
        .engine
        .change_report_status(&auth.actor, id, target)
        .await?;
    Ok(Json(DataResponse::new(report)))
}
