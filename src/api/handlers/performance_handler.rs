//! Performance record handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    routing::post,
    Extension, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::DEFAULT_SATISFACTION;
use crate::domain::{
    Identity, PerformanceResponse, PerformanceSummary, RecordDraft, RecordFilter, RecordStatus,
    UserRole,
};
use crate::errors::AppResult;
use crate::types::{ApiResponse, Paginated, PaginationParams};

/// Upsert payload: one month of metrics for the caller
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertRecordRequest {
    #[schema(example = 2024)]
    pub year: i32,
    #[schema(example = 3)]
    pub month: i32,
    #[validate(range(min = 0.0, message = "revenue cannot be negative"))]
    #[serde(default)]
    pub revenue: f64,
    #[validate(range(min = 0.0, message = "revenue_target cannot be negative"))]
    #[serde(default)]
    pub revenue_target: f64,
    #[validate(range(min = 0, message = "new_clients cannot be negative"))]
    #[serde(default)]
    pub new_clients: i32,
    #[validate(range(min = 0, message = "appointments_completed cannot be negative"))]
    #[serde(default)]
    pub appointments_completed: i32,
    #[validate(range(min = 0, message = "appointments_planned cannot be negative"))]
    #[serde(default)]
    pub appointments_planned: i32,
    #[validate(range(min = 0, message = "sales_completed cannot be negative"))]
    #[serde(default)]
    pub sales_completed: i32,
    #[validate(range(min = 0, message = "files_updated cannot be negative"))]
    #[serde(default)]
    pub files_updated: i32,
    #[validate(range(min = 0, message = "total_files cannot be negative"))]
    #[serde(default)]
    pub total_files: i32,
    #[validate(range(min = 0, message = "event_count cannot be negative"))]
    #[serde(default)]
    pub event_count: i32,
    /// Satisfaction score, 1-5
    #[validate(range(min = 1, max = 5, message = "satisfaction must be between 1 and 5"))]
    #[serde(default = "default_satisfaction")]
    #[schema(example = 4)]
    pub satisfaction: i32,
    #[validate(length(max = 500, message = "comment cannot exceed 500 characters"))]
    pub comment: Option<String>,
    /// Workflow status, defaults to draft
    pub status: Option<RecordStatus>,
}

fn default_satisfaction() -> i32 {
    DEFAULT_SATISFACTION
}

impl From<UpsertRecordRequest> for RecordDraft {
    fn from(payload: UpsertRecordRequest) -> Self {
        RecordDraft {
            year: payload.year,
            month: payload.month,
            revenue: payload.revenue,
            revenue_target: payload.revenue_target,
            new_clients: payload.new_clients,
            appointments_completed: payload.appointments_completed,
            appointments_planned: payload.appointments_planned,
            sales_completed: payload.sales_completed,
            files_updated: payload.files_updated,
            total_files: payload.total_files,
            event_count: payload.event_count,
            satisfaction: payload.satisfaction,
            comment: payload.comment,
            status: payload.status.unwrap_or(RecordStatus::Draft),
        }
    }
}

/// Listing filters + pagination
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListRecordsQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
    pub status: Option<RecordStatus>,
    /// Page number, 1-indexed
    pub page: Option<u64>,
    /// Page size, capped at 100
    pub limit: Option<u64>,
}

/// Summary filters
#[derive(Debug, Deserialize, IntoParams)]
pub struct SummaryQuery {
    /// Reporting year, defaults to the current year
    pub year: Option<i32>,
    pub month: Option<i32>,
}

/// Create performance record routes (all token-protected)
pub fn performance_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(upsert_record).get(list_records))
        .route("/all", get(list_all_records))
        .route("/stats/summary", get(stats_summary))
        .route("/:id", get(get_record).delete(delete_record))
}

/// Create or update the caller's record for a period
#[utoipa::path(
    post,
    path = "/performance",
    tag = "Performance",
    security(("bearer_auth" = [])),
    request_body = UpsertRecordRequest,
    responses(
        (status = 201, description = "Record created", body = PerformanceResponse),
        (status = 200, description = "Record updated", body = PerformanceResponse),
        (status = 400, description = "Validation error or duplicate period")
    )
)]
pub async fn upsert_record(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    ValidatedJson(payload): ValidatedJson<UpsertRecordRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PerformanceResponse>>)> {
    let (record, was_created) = state
        .performance_service
        .upsert(identity.id, RecordDraft::from(payload))
        .await?;

    let (status, message) = if was_created {
        (StatusCode::CREATED, "Record created")
    } else {
        (StatusCode::OK, "Record updated")
    };

    Ok((
        status,
        Json(ApiResponse::with_message(
            PerformanceResponse::from(record),
            message,
        )),
    ))
}

/// The caller's records, newest period first
#[utoipa::path(
    get,
    path = "/performance",
    tag = "Performance",
    security(("bearer_auth" = [])),
    params(ListRecordsQuery),
    responses((status = 200, description = "Paginated records"))
)]
pub async fn list_records(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<ListRecordsQuery>,
) -> AppResult<Json<ApiResponse<Paginated<PerformanceResponse>>>> {
    let pagination = PaginationParams::new(query.page, query.limit);
    let filter = RecordFilter {
        year: query.year,
        month: query.month,
        status: query.status,
    };

    let (records, total) = state
        .performance_service
        .list_for_user(identity.id, filter, pagination.clone())
        .await?;

    let page = Paginated::new(
        records.into_iter().map(PerformanceResponse::from).collect(),
        pagination.page,
        pagination.limit(),
        total,
    );

    Ok(Json(ApiResponse::success(page)))
}

/// Every record across all users (admin/manager only)
#[utoipa::path(
    get,
    path = "/performance/all",
    tag = "Performance",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All records"),
        (status = 403, description = "Caller is not admin or manager")
    )
)]
pub async fn list_all_records(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<ApiResponse<Vec<PerformanceResponse>>>> {
    state
        .auth_service
        .require_role(identity.id, UserRole::SUPERVISORS)
        .await?;

    let records = state.performance_service.list_all().await?;

    Ok(Json(ApiResponse::success(
        records.into_iter().map(PerformanceResponse::from).collect(),
    )))
}

/// Summary statistics over the caller's validated records
#[utoipa::path(
    get,
    path = "/performance/stats/summary",
    tag = "Performance",
    security(("bearer_auth" = [])),
    params(SummaryQuery),
    responses((status = 200, description = "Aggregated statistics", body = PerformanceSummary))
)]
pub async fn stats_summary(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<ApiResponse<PerformanceSummary>>> {
    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let summary = state
        .performance_service
        .summarize(identity.id, year, query.month)
        .await?;

    Ok(Json(ApiResponse::success(summary)))
}

/// Fetch one record (owner only)
#[utoipa::path(
    get,
    path = "/performance/{id}",
    tag = "Performance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record", body = PerformanceResponse),
        (status = 403, description = "Caller does not own the record"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PerformanceResponse>>> {
    let record = state
        .performance_service
        .get_owned(identity.id, id)
        .await?;

    Ok(Json(ApiResponse::success(PerformanceResponse::from(record))))
}

/// Delete one record (owner only)
#[utoipa::path(
    delete,
    path = "/performance/{id}",
    tag = "Performance",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record deleted"),
        (status = 403, description = "Caller does not own the record"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_record(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .performance_service
        .delete_owned(identity.id, id)
        .await?;

    Ok(Json(ApiResponse::message("Record deleted")))
}
