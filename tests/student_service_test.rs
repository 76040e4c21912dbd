//! Student and report service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use serde_json::json;
use uuid::Uuid;

use student_portal::domain::{
    GpaRecord, Report, ReportStatus, ReportType, Student, UserRole,
};
use student_portal::errors::AppError;
use student_portal::infra::{
    MockReportRepository, MockStudentRepository, MockUserRepository, Persistence,
    ReportRepository, StudentRepository, UserRepository,
};
use student_portal::services::{
    ReportGenerator, ReportService, StudentDirectory, StudentService,
};
use student_portal::types::PaginationParams;

fn test_student(user_id: Option<Uuid>) -> Student {
    Student {
        id: Uuid::new_v4(),
        user_id,
        full_name: "Sam Park".to_string(),
        email: "spark@example.com".to_string(),
        program: "Computer Science".to_string(),
        year: 2,
        enrolled_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_record(student_id: Uuid, gpa: f32) -> GpaRecord {
    GpaRecord {
        id: Uuid::new_v4(),
        student_id,
        term: "2025-fall".to_string(),
        gpa,
        credits: 15,
        recorded_at: Utc::now(),
    }
}

/// Persistence stub wrapping per-repository mocks
struct TestPersistence {
    users: Arc<MockUserRepository>,
    students: Arc<MockStudentRepository>,
    reports: Arc<MockReportRepository>,
}

impl TestPersistence {
    fn new() -> Self {
        Self {
            users: Arc::new(MockUserRepository::new()),
            students: Arc::new(MockStudentRepository::new()),
            reports: Arc::new(MockReportRepository::new()),
        }
    }

    fn with_students(students: MockStudentRepository) -> Self {
        Self {
            students: Arc::new(students),
            ..Self::new()
        }
    }

    fn with_reports(students: MockStudentRepository, reports: MockReportRepository) -> Self {
        Self {
            students: Arc::new(students),
            reports: Arc::new(reports),
            ..Self::new()
        }
    }
}

impl Persistence for TestPersistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn students(&self) -> Arc<dyn StudentRepository> {
        self.students.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.reports.clone()
    }
}

// -----------------------------------------------------------------------------
// Student directory
// -----------------------------------------------------------------------------

#[tokio::test]
async fn peers_exclude_own_record() {
    let user_id = Uuid::new_v4();
    let own = test_student(Some(user_id));
    let own_clone = own.clone();
    let other = test_student(None);
    let other_clone = other.clone();

    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_user_id()
        .with(eq(user_id))
        .returning(move |_| Ok(Some(own_clone.clone())));
    students
        .expect_list()
        .returning(move |_| Ok((vec![own.clone(), other_clone.clone()], 2)));

    let directory = StudentDirectory::new(Arc::new(TestPersistence::with_students(students)));
    let (peers, total) = directory
        .list_peers(user_id, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(total, 1);
    assert_eq!(peers.len(), 1);
    assert_eq!(peers[0].id, other.id);
}

#[tokio::test]
async fn peers_keep_everything_without_linked_record() {
    let user_id = Uuid::new_v4();
    let roster = vec![test_student(None), test_student(None)];
    let roster_clone = roster.clone();

    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_user_id()
        .with(eq(user_id))
        .returning(|_| Ok(None));
    students
        .expect_list()
        .returning(move |_| Ok((roster_clone.clone(), 2)));

    let directory = StudentDirectory::new(Arc::new(TestPersistence::with_students(students)));
    let (peers, total) = directory
        .list_peers(user_id, PaginationParams::default())
        .await
        .unwrap();

    assert_eq!(total, 2);
    assert_eq!(peers.len(), 2);
}

#[tokio::test]
async fn detail_includes_gpa_history() {
    let student = test_student(None);
    let id = student.id;
    let records = vec![test_record(id, 3.7), test_record(id, 3.2)];
    let records_clone = records.clone();
    let student_clone = student.clone();

    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .with(eq(id))
        .returning(move |_| Ok(Some(student_clone.clone())));
    students
        .expect_gpa_records()
        .with(eq(id))
        .returning(move |_| Ok(records_clone.clone()));

    let directory = StudentDirectory::new(Arc::new(TestPersistence::with_students(students)));
    let detail = directory.get_student(id).await.unwrap();

    assert_eq!(detail.student.full_name, "Sam Park");
    assert_eq!(detail.gpa_records.len(), 2);
}

#[tokio::test]
async fn detail_for_unknown_student_is_not_found() {
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().returning(|_| Ok(None));

    let directory = StudentDirectory::new(Arc::new(TestPersistence::with_students(students)));
    let err = directory.get_student(Uuid::new_v4()).await.unwrap_err();

    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn staff_see_every_gpa_record() {
    let mut students = MockStudentRepository::new();
    students
        .expect_all_gpa_records()
        .returning(|| Ok(vec![test_record(Uuid::new_v4(), 3.0)]));

    let directory = StudentDirectory::new(Arc::new(TestPersistence::with_students(students)));
    let records = directory
        .gpa_records_for(Uuid::new_v4(), &UserRole::Staff)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn students_see_only_their_own_records() {
    let user_id = Uuid::new_v4();
    let own = test_student(Some(user_id));
    let own_id = own.id;

    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_user_id()
        .with(eq(user_id))
        .returning(move |_| Ok(Some(own.clone())));
    students
        .expect_gpa_records()
        .with(eq(own_id))
        .returning(move |id| Ok(vec![test_record(id, 3.9)]));

    let directory = StudentDirectory::new(Arc::new(TestPersistence::with_students(students)));
    let records = directory
        .gpa_records_for(user_id, &UserRole::Student)
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].student_id, own_id);
}

#[tokio::test]
async fn unlinked_student_account_has_no_records() {
    let mut students = MockStudentRepository::new();
    students.expect_find_by_user_id().returning(|_| Ok(None));

    let directory = StudentDirectory::new(Arc::new(TestPersistence::with_students(students)));
    let err = directory
        .gpa_records_for(Uuid::new_v4(), &UserRole::Student)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound));
}

// -----------------------------------------------------------------------------
// Report tasks
// -----------------------------------------------------------------------------

#[tokio::test]
async fn students_cannot_report_on_other_students() {
    let requester = Uuid::new_v4();
    let other = test_student(Some(Uuid::new_v4()));

    let mut students = MockStudentRepository::new();
    students
        .expect_find_by_id()
        .returning(move |_| Ok(Some(other.clone())));

    let generator = ReportGenerator::new(Arc::new(TestPersistence::with_reports(
        students,
        MockReportRepository::new(),
    )));
    let err = generator
        .generate(
            Uuid::new_v4(),
            ReportType::Comprehensive,
            requester,
            &UserRole::Student,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn report_for_unknown_student_is_not_found() {
    let mut students = MockStudentRepository::new();
    students.expect_find_by_id().returning(|_| Ok(None));

    let generator = ReportGenerator::new(Arc::new(TestPersistence::with_reports(
        students,
        MockReportRepository::new(),
    )));
    let err = generator
        .generate(
            Uuid::new_v4(),
            ReportType::Academic,
            Uuid::new_v4(),
            &UserRole::Staff,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound));
}

#[tokio::test]
async fn status_hidden_from_other_students() {
    let owner = Uuid::new_v4();
    let report = Report::new(Uuid::new_v4(), owner, ReportType::Comprehensive);
    let task_id = report.id;

    let mut reports = MockReportRepository::new();
    reports
        .expect_find_by_id()
        .with(eq(task_id))
        .returning(move |_| Ok(Some(report.clone())));

    let generator = ReportGenerator::new(Arc::new(TestPersistence::with_reports(
        MockStudentRepository::new(),
        reports,
    )));

    let err = generator
        .status(task_id, Uuid::new_v4(), &UserRole::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));
}

#[tokio::test]
async fn status_visible_to_admins() {
    let report = Report::new(Uuid::new_v4(), Uuid::new_v4(), ReportType::Comprehensive);
    let task_id = report.id;

    let mut reports = MockReportRepository::new();
    reports
        .expect_find_by_id()
        .returning(move |_| Ok(Some(report.clone())));

    let generator = ReportGenerator::new(Arc::new(TestPersistence::with_reports(
        MockStudentRepository::new(),
        reports,
    )));

    let status = generator
        .status(task_id, Uuid::new_v4(), &UserRole::Admin)
        .await
        .unwrap();
    assert_eq!(status.task_id, task_id);
    assert_eq!(status.status, ReportStatus::Pending);
    assert!(status.result.is_none());
}

#[tokio::test]
async fn completed_report_exposes_download_url() {
    let owner = Uuid::new_v4();
    let mut report = Report::new(Uuid::new_v4(), owner, ReportType::Comprehensive);
    report.status = ReportStatus::Completed;
    report.progress = 100;
    report.content = Some(json!({"student": {"full_name": "Sam Park"}}));
    let task_id = report.id;

    let mut reports = MockReportRepository::new();
    reports
        .expect_find_by_id()
        .returning(move |_| Ok(Some(report.clone())));

    let generator = ReportGenerator::new(Arc::new(TestPersistence::with_reports(
        MockStudentRepository::new(),
        reports,
    )));

    let status = generator
        .status(task_id, owner, &UserRole::Student)
        .await
        .unwrap();
    let result = status.result.expect("completed task should carry a result");
    assert_eq!(
        result.report_url,
        format!("/api/students/reports/{}/download/", task_id)
    );

    let document = generator
        .download(task_id, owner, &UserRole::Student)
        .await
        .unwrap();
    assert_eq!(document["student"]["full_name"], "Sam Park");
}

#[tokio::test]
async fn pending_report_cannot_be_downloaded() {
    let owner = Uuid::new_v4();
    let report = Report::new(Uuid::new_v4(), owner, ReportType::Comprehensive);
    let task_id = report.id;

    let mut reports = MockReportRepository::new();
    reports
        .expect_find_by_id()
        .returning(move |_| Ok(Some(report.clone())));

    let generator = ReportGenerator::new(Arc::new(TestPersistence::with_reports(
        MockStudentRepository::new(),
        reports,
    )));

    let err = generator
        .download(task_id, owner, &UserRole::Student)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}
