//! Report generation entities.
//!
//! Reports are produced asynchronously: the API returns a task id
//! immediately and the frontend polls the status endpoint until the task
//! reaches a terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Kinds of reports the portal can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    /// Full report: academic history plus achievements
    Comprehensive,
    /// GPA records and standing only
    Academic,
    /// Achievements section only
    Achievements,
}

impl Default for ReportType {
    fn default() -> Self {
        ReportType::Comprehensive
    }
}

impl From<&str> for ReportType {
    fn from(s: &str) -> Self {
        match s {
            "academic" => ReportType::Academic,
            "achievements" => ReportType::Achievements,
            _ => ReportType::Comprehensive,
        }
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::Comprehensive => write!(f, "comprehensive"),
            ReportType::Academic => write!(f, "academic"),
            ReportType::Achievements => write!(f, "achievements"),
        }
    }
}

/// Lifecycle of a report task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ReportStatus {
    /// Terminal states stop the frontend's polling loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Completed | ReportStatus::Failed)
    }
}

impl From<&str> for ReportStatus {
    fn from(s: &str) -> Self {
        match s {
            "processing" => ReportStatus::Processing,
            "completed" => ReportStatus::Completed,
            "failed" => ReportStatus::Failed,
            _ => ReportStatus::Pending,
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Pending => write!(f, "pending"),
            ReportStatus::Processing => write!(f, "processing"),
            ReportStatus::Completed => write!(f, "completed"),
            ReportStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Report task entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Task identifier returned to the client
    pub id: Uuid,
    pub student_id: Uuid,
    /// Account that requested the report
    pub requested_by: Uuid,
    pub report_type: ReportType,
    pub status: ReportStatus,
    /// Completion percentage, 0-100
    pub progress: i16,
    /// Rendered report document, set once completed
    pub content: Option<serde_json::Value>,
    /// Failure reason, set when status is failed
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Create a new pending task
    pub fn new(student_id: Uuid, requested_by: Uuid, report_type: ReportType) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            student_id,
            requested_by,
            report_type,
            status: ReportStatus::Pending,
            progress: 0,
            content: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Status payload returned by the polling endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportStatusResponse {
    pub task_id: Uuid,
    pub status: ReportStatus,
    /// Completion percentage, 0-100
    #[schema(example = 50)]
    pub progress: i16,
    /// Download location, present once completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ReportResult>,
    /// Failure reason, present once failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Completed-report pointer inside the status payload
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportResult {
    #[schema(example = "/api/students/reports/550e8400-e29b-41d4-a716-446655440000/download/")]
    pub report_url: String,
}

/// Report list entry
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportSummary {
    pub task_id: Uuid,
    pub student_id: Uuid,
    pub report_type: ReportType,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&Report> for ReportStatusResponse {
    fn from(report: &Report) -> Self {
        let result = (report.status == ReportStatus::Completed).then(|| ReportResult {
            report_url: format!("/api/students/reports/{}/download/", report.id),
        });
        Self {
            task_id: report.id,
            status: report.status,
            progress: report.progress,
            result,
            error: report.error.clone(),
        }
    }
}

impl From<&Report> for ReportSummary {
    fn from(report: &Report) -> Self {
        Self {
            task_id: report.id,
            student_id: report.student_id,
            report_type: report.report_type,
            status: report.status,
            created_at: report.created_at,
        }
    }
}
