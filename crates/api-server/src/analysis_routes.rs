//! Analysis API Routes
//!
//! Endpoints for creating, querying and cleaning up investment analyses.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use advisor_core::{
    AnalysisRecord, AnalysisRequest, AnalysisStatus, AnalysisSummary, ServiceStats,
};
use analysis_orchestrator::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};

use crate::{ApiResponse, AppError, AppState};

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// Filter to one status.
    #[serde(default)]
    pub status: Option<AnalysisStatus>,
    /// Page size, 1..=100 (default 50).
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct CleanupQuery {
    /// Age horizon in days; defaults to the configured retention.
    #[serde(default)]
    pub days: Option<i64>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CleanupResult {
    pub removed: usize,
}

pub fn analysis_routes() -> Router<AppState> {
    Router::new()
        .route("/analyses", post(create_analysis).get(list_analyses))
        .route("/analyses/cleanup", post(cleanup_analyses))
        .route(
            "/analyses/:request_id",
            get(get_analysis).delete(delete_analysis),
        )
        .route("/stats", get(get_stats))
}

#[utoipa::path(
    post,
    path = "/analyses",
    request_body = AnalysisRequest,
    responses(
        (status = 201, description = "Analysis record, terminal or still in progress"),
        (status = 400, description = "Invalid company symbols")
    ),
    tag = "Analyses"
)]
pub(crate) async fn create_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AnalysisRecord>>), AppError> {
    let record = state.service.create_analysis(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(record))))
}

#[utoipa::path(
    get,
    path = "/analyses",
    params(ListQuery),
    responses((status = 200, description = "Analysis summaries, newest first")),
    tag = "Analyses"
)]
pub(crate) async fn list_analyses(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiResponse<Vec<AnalysisSummary>>>, AppError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let summaries = state.service.list_analyses(query.status, limit);
    Ok(Json(ApiResponse::success(summaries)))
}

#[utoipa::path(
    get,
    path = "/analyses/{request_id}",
    params(("request_id" = String, Path, description = "Analysis request id")),
    responses(
        (status = 200, description = "Full analysis record"),
        (status = 404, description = "Unknown request id")
    ),
    tag = "Analyses"
)]
pub(crate) async fn get_analysis(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ApiResponse<AnalysisRecord>>, AppError> {
    let record = state
        .service
        .get_analysis(&request_id)
        .ok_or_else(|| AppError::NotFound("Analysis not found".to_string()))?;
    Ok(Json(ApiResponse::success(record)))
}

#[utoipa::path(
    delete,
    path = "/analyses/{request_id}",
    params(("request_id" = String, Path, description = "Analysis request id")),
    responses(
        (status = 204, description = "Analysis deleted"),
        (status = 404, description = "Unknown request id")
    ),
    tag = "Analyses"
)]
pub(crate) async fn delete_analysis(
    State(state): State<AppState>,
    Path(request_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.service.delete_analysis(&request_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound("Analysis not found".to_string()))
    }
}

#[utoipa::path(
    post,
    path = "/analyses/cleanup",
    params(CleanupQuery),
    responses((status = 200, description = "Number of analyses removed")),
    tag = "Analyses"
)]
pub(crate) async fn cleanup_analyses(
    State(state): State<AppState>,
    Query(query): Query<CleanupQuery>,
) -> Result<Json<ApiResponse<CleanupResult>>, AppError> {
    let removed = state.service.cleanup_old_analyses(query.days);
    Ok(Json(ApiResponse::success(CleanupResult { removed })))
}

#[utoipa::path(
    get,
    path = "/stats",
    responses((status = 200, description = "Store totals and per-status counts")),
    tag = "Analyses"
)]
pub(crate) async fn get_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ServiceStats>>, AppError> {
    Ok(Json(ApiResponse::success(state.service.get_service_stats())))
}
