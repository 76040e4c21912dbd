//! Report generation service.
//!
//! `generate` persists a pending task and returns immediately; a
//! background tokio task loads the student's academic history, renders
//! the report document and advances the persisted progress so the
//! frontend's polling loop can display it. Failures are persisted with a
//! reason instead of being lost with the task.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{
    weighted_gpa, GpaRecord, Report, ReportStatus, ReportStatusResponse, ReportSummary,
    ReportType, Student, StudentResponse, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{Persistence, ReportRepository, StudentRepository};

/// Report service trait for dependency injection.
#[async_trait]
pub trait ReportService: Send + Sync {
    /// Start report generation for a student, returning the pending task
    async fn generate(
        &self,
        student_id: Uuid,
        report_type: ReportType,
        requested_by: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<Report>;

    /// Current task state for the polling endpoint
    async fn status(
        &self,
        task_id: Uuid,
        requester: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<ReportStatusResponse>;

    /// Tasks visible to the calling account, newest first
    async fn list(&self, requester: Uuid, requester_role: &UserRole)
        -> AppResult<Vec<ReportSummary>>;

    /// Rendered document of a completed task
    async fn download(
        &self,
        task_id: Uuid,
        requester: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<serde_json::Value>;
}

/// Concrete implementation of ReportService.
pub struct ReportGenerator<P: Persistence> {
    persistence: Arc<P>,
}

impl<P: Persistence> ReportGenerator<P> {
    /// Create new report service instance
    pub fn new(persistence: Arc<P>) -> Self {
        Self { persistence }
    }

    /// Load a task and enforce that only the requester or an admin sees it
    async fn find_owned(
        &self,
        task_id: Uuid,
        requester: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<Report> {
        let report = self
            .persistence
            .reports()
            .find_by_id(task_id)
            .await?
            .ok_or_not_found()?;

        if report.requested_by != requester && !requester_role.is_admin() {
            return Err(AppError::Forbidden);
        }

        Ok(report)
    }
}

#[async_trait]
impl<P: Persistence> ReportService for ReportGenerator<P> {
    async fn generate(
        &self,
        student_id: Uuid,
        report_type: ReportType,
        requested_by: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<Report> {
        let students = self.persistence.students();
        let student = students.find_by_id(student_id).await?.ok_or_not_found()?;

        // Students may only report on their own record
        if !requester_role.is_staff() && student.user_id != Some(requested_by) {
            return Err(AppError::Forbidden);
        }

        let report = self
            .persistence
            .reports()
            .create(Report::new(student_id, requested_by, report_type))
            .await?;

        let task_id = report.id;
        let reports = self.persistence.reports();
        tokio::spawn(async move {
            if let Err(e) = run_report(&*reports, &*students, task_id, student, report_type).await
            {
                tracing::error!(%task_id, error = %e, "report generation failed");
                if let Err(persist_err) = reports.fail(task_id, e.to_string()).await {
                    tracing::error!(%task_id, error = %persist_err, "failed to persist report failure");
                }
            }
        });

        Ok(report)
    }

    async fn status(
        &self,
        task_id: Uuid,
        requester: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<ReportStatusResponse> {
        let report = self.find_owned(task_id, requester, requester_role).await?;
        Ok(ReportStatusResponse::from(&report))
    }

    async fn list(
        &self,
        requester: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<Vec<ReportSummary>> {
        let reports = if requester_role.is_admin() {
            self.persistence.reports().list_all().await?
        } else {
            self.persistence.reports().list_for_user(requester).await?
        };

        Ok(reports.iter().map(ReportSummary::from).collect())
    }

    async fn download(
        &self,
        task_id: Uuid,
        requester: Uuid,
        requester_role: &UserRole,
    ) -> AppResult<serde_json::Value> {
        let report = self.find_owned(task_id, requester, requester_role).await?;

        match report.status {
            ReportStatus::Completed => report
                .content
                .ok_or_else(|| AppError::internal("completed report has no content")),
            ReportStatus::Failed => Err(AppError::validation(
                report
                    .error
                    .unwrap_or_else(|| "Report generation failed".to_string()),
            )),
            _ => Err(AppError::Conflict("Report is still being generated".into())),
        }
    }
}

/// Execute one report task end to end, persisting progress along the way.
async fn run_report(
    reports: &dyn ReportRepository,
    students: &dyn StudentRepository,
    task_id: Uuid,
    student: Student,
    report_type: ReportType,
) -> AppResult<()> {
    reports
        .set_progress(task_id, ReportStatus::Processing, 10)
        .await?;

    let records = students.gpa_records(student.id).await?;
    reports
        .set_progress(task_id, ReportStatus::Processing, 50)
        .await?;

    let content = render_report(&student, &records, report_type);
    reports
        .set_progress(task_id, ReportStatus::Processing, 80)
        .await?;

    reports.complete(task_id, content).await?;
    Ok(())
}

/// Render the report document for a student.
pub fn render_report(
    student: &Student,
    records: &[GpaRecord],
    report_type: ReportType,
) -> serde_json::Value {
    let profile = StudentResponse::from(student.clone());
    let mut doc = json!({
        "report_type": report_type.to_string(),
        "generated_at": Utc::now(),
        "student": profile,
    });

    if matches!(report_type, ReportType::Comprehensive | ReportType::Academic) {
        doc["academic"] = json!({
            "gpa_records": records,
            "gpa_average": weighted_gpa(records),
            "standing": academic_standing(records),
        });
    }

    if matches!(
        report_type,
        ReportType::Comprehensive | ReportType::Achievements
    ) {
        doc["achievements"] = json!(achievements(records));
    }

    doc
}

/// Academic standing derived from the credit-weighted GPA average
fn academic_standing(records: &[GpaRecord]) -> &'static str {
    match weighted_gpa(records) {
        Some(avg) if avg >= 3.5 => "dean's list",
        Some(avg) if avg >= 2.0 => "good standing",
        Some(_) => "academic probation",
        None => "no records",
    }
}

/// Achievement entries synthesized from strong terms
fn achievements(records: &[GpaRecord]) -> Vec<serde_json::Value> {
    records
        .iter()
        .filter(|r| r.gpa >= 3.5)
        .map(|r| {
            json!({
                "title": format!("Honor roll, {}", r.term),
                "term": r.term,
                "gpa": r.gpa,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        let now = Utc::now();
        Student {
            id: Uuid::new_v4(),
            user_id: None,
            full_name: "John Doe".into(),
            email: "jdoe@students.example.edu".into(),
            program: "Computer Science".into(),
            year: 2,
            enrolled_at: now,
            updated_at: now,
        }
    }

    fn record(student_id: Uuid, term: &str, gpa: f32, credits: i16) -> GpaRecord {
        GpaRecord {
            id: Uuid::new_v4(),
            student_id,
            term: term.into(),
            gpa,
            credits,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn academic_report_has_gpa_summary() {
        let s = student();
        let records = vec![record(s.id, "2025-spring", 3.8, 15), record(s.id, "2025-fall", 3.2, 15)];

        let doc = render_report(&s, &records, ReportType::Academic);

        assert_eq!(doc["report_type"], "academic");
        assert_eq!(doc["academic"]["standing"], "dean's list");
        let avg = doc["academic"]["gpa_average"].as_f64().unwrap();
        assert!((avg - 3.5).abs() < 1e-6);
        assert!(doc.get("achievements").is_none());
    }

    #[test]
    fn achievements_only_for_strong_terms() {
        let s = student();
        let records = vec![record(s.id, "2025-spring", 3.9, 15), record(s.id, "2025-fall", 2.1, 15)];

        let doc = render_report(&s, &records, ReportType::Achievements);

        let achievements = doc["achievements"].as_array().unwrap();
        assert_eq!(achievements.len(), 1);
        assert_eq!(achievements[0]["term"], "2025-spring");
        assert!(doc.get("academic").is_none());
    }

    #[test]
    fn comprehensive_report_has_both_sections() {
        let s = student();
        let records = vec![record(s.id, "2025-fall", 3.6, 12)];

        let doc = render_report(&s, &records, ReportType::Comprehensive);

        assert!(doc.get("academic").is_some());
        assert!(doc.get("achievements").is_some());
        assert_eq!(doc["student"]["full_name"], "John Doe");
    }

    #[test]
    fn standing_without_records() {
        assert_eq!(academic_standing(&[]), "no records");
        let s = student();
        assert_eq!(
            academic_standing(&[record(s.id, "2025-fall", 1.5, 12)]),
            "academic probation"
        );
    }
}
