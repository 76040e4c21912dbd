//! Student directory and report generation endpoints.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    ReportStatusResponse, ReportSummary, ReportType, StudentDetail, StudentResponse,
};
use crate::errors::AppResult;
use crate::types::{Accepted, Paginated, PaginationParams};

/// Report generation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenerateReportRequest {
    /// The student the report is about
    pub student_id: Uuid,
    /// Report flavor: "comprehensive" (default), "academic" or "achievements"
    #[schema(example = "comprehensive")]
    pub report_type: Option<String>,
}

/// Create student routes (all require authentication)
pub fn student_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students))
        .route("/peers", get(list_peers))
        .route("/generate-report", post(generate_report))
        .route("/report-status/:task_id", get(report_status))
        .route("/reports", get(list_reports))
        .route("/reports/:task_id/download", get(download_report))
        .route("/:id", get(get_student))
}

/// Paginated student directory
#[utoipa::path(
    get,
    path = "/api/students/",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Results per page")
    ),
    responses(
        (status = 200, description = "Paginated student directory"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<StudentResponse>>> {
    let (students, total) = state.student_service.list_students(params.clone()).await?;
    let data = students.into_iter().map(StudentResponse::from).collect();

    Ok(Json(Paginated::new(
        data,
        params.page,
        params.per_page,
        total,
    )))
}

/// Directory excluding the caller's own student record
#[utoipa::path(
    get,
    path = "/api/students/peers/",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(
        ("page" = Option<u64>, Query, description = "Page number, starting at 1"),
        ("per_page" = Option<u64>, Query, description = "Results per page")
    ),
    responses(
        (status = 200, description = "Peers of the calling account"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_peers(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<StudentResponse>>> {
    let (students, total) = state
        .student_service
        .list_peers(user.id, params.clone())
        .await?;
    let data = students.into_iter().map(StudentResponse::from).collect();

    Ok(Json(Paginated::new(
        data,
        params.page,
        params.per_page,
        total,
    )))
}

/// One student with academic history
#[utoipa::path(
    get,
    path = "/api/students/{id}/",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student detail", body = StudentDetail),
        (status = 404, description = "Student not found")
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    Extension(_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<StudentDetail>> {
    let detail = state.student_service.get_student(id).await?;

    Ok(Json(detail))
}

/// Kick off background report generation
#[utoipa::path(
    post,
    path = "/api/students/generate-report/",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = GenerateReportRequest,
    responses(
        (status = 202, description = "Report task accepted", body = ReportStatusResponse),
        (status = 403, description = "Students may only request their own report"),
        (status = 404, description = "Student not found")
    )
)]
pub async fn generate_report(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<GenerateReportRequest>,
) -> AppResult<Accepted<ReportStatusResponse>> {
    let report_type = payload
        .report_type
        .as_deref()
        .map(ReportType::from)
        .unwrap_or_default();

    let report = state
        .report_service
        .generate(payload.student_id, report_type, user.id, &user.role)
        .await?;

    Ok(Accepted(ReportStatusResponse::from(&report)))
}

/// Poll the state of a report task
#[utoipa::path(
    get,
    path = "/api/students/report-status/{task_id}/",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("task_id" = Uuid, Path, description = "Report task id")),
    responses(
        (status = 200, description = "Task state", body = ReportStatusResponse),
        (status = 403, description = "Task belongs to another account"),
        (status = 404, description = "Task not found")
    )
)]
pub async fn report_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<ReportStatusResponse>> {
    let status = state
        .report_service
        .status(task_id, user.id, &user.role)
        .await?;

    Ok(Json(status))
}

/// Report tasks visible to the calling account
#[utoipa::path(
    get,
    path = "/api/students/reports/",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Report tasks, newest first", body = [ReportSummary]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_reports(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ReportSummary>>> {
    let reports = state.report_service.list(user.id, &user.role).await?;

    Ok(Json(reports))
}

/// Rendered document of a completed report
#[utoipa::path(
    get,
    path = "/api/students/reports/{task_id}/download/",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("task_id" = Uuid, Path, description = "Report task id")),
    responses(
        (status = 200, description = "Report document"),
        (status = 403, description = "Task belongs to another account"),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Report is still being generated")
    )
)]
pub async fn download_report(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let document = state
        .report_service
        .download(task_id, user.id, &user.role)
        .await?;

    Ok(Json(document))
}
