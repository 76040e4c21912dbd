//! Integration tests for API endpoints.
//!
//! These tests drive the full router with mock services, so routing,
//! middleware and serialization are exercised without a real database.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
use serde_json::{json, Value};
use tower::{Layer, ServiceExt};
use tower_http::normalize_path::NormalizePathLayer;
use uuid::Uuid;

use student_portal::api::{create_router, AppState};
use student_portal::config::Config;
use student_portal::domain::{
    GpaRecord, Report, ReportStatusResponse, ReportSummary, ReportType, Student, StudentDetail,
    UpdateAccount, UpdateProfile, User, UserRole,
};
use student_portal::errors::{AppError, AppResult};
use student_portal::infra::Database;
use student_portal::services::{
    AccountService, AuthService, Claims, RefreshedToken, Registration, ReportService,
    StudentService, TokenPair,
};
use student_portal::types::PaginationParams;

const STUDENT_TOKEN: &str = "valid-student-token";
const ADMIN_TOKEN: &str = "valid-admin-token";

fn test_user(role: UserRole) -> User {
    User {
        id: Uuid::new_v4(),
        username: "jdoe".to_string(),
        email: "jdoe@example.com".to_string(),
        password_hash: "hashed".to_string(),
        full_name: "Jane Doe".to_string(),
        role,
        is_active: true,
        date_joined: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn test_student() -> Student {
    Student {
        id: Uuid::new_v4(),
        user_id: None,
        full_name: "Sam Park".to_string(),
        email: "spark@example.com".to_string(),
        program: "Computer Science".to_string(),
        year: 2,
        enrolled_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// -----------------------------------------------------------------------------
// Mock services
// -----------------------------------------------------------------------------

struct MockAuthService;

#[async_trait]
impl AuthService for MockAuthService {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        let mut user = test_user(UserRole::Student);
        user.username = registration.username;
        user.email = registration.email;
        user.full_name = registration.full_name;
        Ok(user)
    }

    async fn login(&self, username: String, _password: String) -> AppResult<TokenPair> {
        if username == "locked" {
            return Err(AppError::InvalidCredentials);
        }
        Ok(TokenPair {
            access: "mock-access".to_string(),
            refresh: "mock-refresh".to_string(),
        })
    }

    async fn refresh(&self, refresh_token: String) -> AppResult<RefreshedToken> {
        if refresh_token == "mock-refresh" {
            Ok(RefreshedToken {
                access: "new-access".to_string(),
            })
        } else {
            Err(AppError::Unauthorized)
        }
    }

    fn verify_access(&self, token: &str) -> AppResult<Claims> {
        let role = match token {
            STUDENT_TOKEN => "student",
            ADMIN_TOKEN => "admin",
            _ => return Err(AppError::Unauthorized),
        };
        Ok(Claims {
            token_type: "access".to_string(),
            user_id: Uuid::new_v4(),
            username: "jdoe".to_string(),
            role: role.to_string(),
            jti: Uuid::new_v4(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        })
    }
}

struct MockAccountService;

#[async_trait]
impl AccountService for MockAccountService {
    async fn get_account(&self, id: Uuid) -> AppResult<User> {
        let mut user = test_user(UserRole::Student);
        user.id = id;
        Ok(user)
    }

    async fn update_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<User> {
        let mut user = test_user(UserRole::Student);
        user.id = id;
        if let Some(full_name) = update.full_name {
            user.full_name = full_name;
        }
        Ok(user)
    }

    async fn list_accounts(&self) -> AppResult<Vec<User>> {
        Ok(vec![test_user(UserRole::Student), test_user(UserRole::Admin)])
    }

    async fn update_account(&self, id: Uuid, update: UpdateAccount) -> AppResult<User> {
        let mut user = test_user(UserRole::Student);
        user.id = id;
        if let Some(role) = update.role {
            user.role = UserRole::from(role.as_str());
        }
        if let Some(is_active) = update.is_active {
            user.is_active = is_active;
        }
        Ok(user)
    }

    async fn deactivate_account(&self, _id: Uuid) -> AppResult<()> {
        Ok(())
    }
}

struct MockStudentService;

#[async_trait]
impl StudentService for MockStudentService {
    async fn list_students(&self, _params: PaginationParams) -> AppResult<(Vec<Student>, u64)> {
        Ok((vec![test_student()], 1))
    }

    async fn list_peers(
        &self,
        _user_id: Uuid,
        _params: PaginationParams,
    ) -> AppResult<(Vec<Student>, u64)> {
        Ok((vec![], 0))
    }

    async fn get_student(&self, id: Uuid) -> AppResult<StudentDetail> {
        let mut student = test_student();
        student.id = id;
        Ok(StudentDetail {
            student: student.into(),
            gpa_records: vec![],
        })
    }

    async fn gpa_records_for(
        &self,
        _user_id: Uuid,
        role: &UserRole,
    ) -> AppResult<Vec<GpaRecord>> {
        if matches!(role, UserRole::Student) {
            return Err(AppError::NotFound);
        }
        Ok(vec![])
    }
}

struct MockReportService;

#[async_trait]
impl ReportService for MockReportService {
    async fn generate(
        &self,
        student_id: Uuid,
        report_type: ReportType,
        requested_by: Uuid,
        _requester_role: &UserRole,
    ) -> AppResult<Report> {
        Ok(Report::new(student_id, requested_by, report_type))
    }

    async fn status(
        &self,
        task_id: Uuid,
        _requester: Uuid,
        _requester_role: &UserRole,
    ) -> AppResult<ReportStatusResponse> {
        let report = Report::new(Uuid::new_v4(), Uuid::new_v4(), ReportType::Comprehensive);
        let mut status = ReportStatusResponse::from(&report);
        status.task_id = task_id;
        Ok(status)
    }

    async fn list(
        &self,
        _requester: Uuid,
        _requester_role: &UserRole,
    ) -> AppResult<Vec<ReportSummary>> {
        Ok(vec![])
    }

    async fn download(
        &self,
        _task_id: Uuid,
        _requester: Uuid,
        _requester_role: &UserRole,
    ) -> AppResult<Value> {
        Ok(json!({"student": {"full_name": "Sam Park"}}))
    }
}

// -----------------------------------------------------------------------------
// Test helpers
// -----------------------------------------------------------------------------

fn app_with_config(config: Config) -> axum::Router {
    // Prepared exec results feed the health/status ping queries
    let database = Arc::new(Database::from_connection(
        MockDatabase::new(DatabaseBackend::Sqlite)
            .append_exec_results(vec![
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                };
                4
            ])
            .into_connection(),
    ));

    let state = AppState::new(
        Arc::new(MockAuthService),
        Arc::new(MockAccountService),
        Arc::new(MockStudentService),
        Arc::new(MockReportService),
        database,
        config,
    );

    create_router(state)
}

fn test_app() -> axum::Router {
    app_with_config(Config::for_tests())
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = test_app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::String(
            String::from_utf8_lossy(&bytes).to_string(),
        ))
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn authed_request(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, "localhost")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[tokio::test]
async fn home_page_lists_entry_points() {
    let request = Request::builder()
        .uri("/")
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    let page = body.as_str().unwrap();
    assert!(page.contains("Student Portal API"));
    assert!(page.contains("/api/token/"));
}

#[tokio::test]
async fn api_root_lists_sections() {
    let request = Request::builder()
        .uri("/api")
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], "/api/token/");
    assert_eq!(body["students"], "/api/students/");
}

#[tokio::test]
async fn obtain_token_returns_pair() {
    let request = json_request(
        Method::POST,
        "/api/token",
        json!({"username": "jdoe", "password": "SecurePass123!"}),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access"], "mock-access");
    assert_eq!(body["refresh"], "mock-refresh");
}

#[tokio::test]
async fn obtain_token_rejects_bad_credentials() {
    let request = json_request(
        Method::POST,
        "/api/token",
        json!({"username": "locked", "password": "wrong"}),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn refresh_token_issues_new_access() {
    let request = json_request(
        Method::POST,
        "/api/token/refresh",
        json!({"refresh": "mock-refresh"}),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access"], "new-access");
}

#[tokio::test]
async fn refresh_token_rejects_unknown_token() {
    let request = json_request(
        Method::POST,
        "/api/token/refresh",
        json!({"refresh": "garbage"}),
    );
    let (status, _) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_creates_account() {
    let request = json_request(
        Method::POST,
        "/api/accounts/register",
        json!({
            "username": "newuser",
            "email": "newuser@example.com",
            "password": "SecurePass123!",
            "full_name": "New User"
        }),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "newuser");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn register_rejects_short_password() {
    let request = json_request(
        Method::POST,
        "/api/accounts/register",
        json!({
            "username": "newuser",
            "email": "newuser@example.com",
            "password": "short",
            "full_name": "New User"
        }),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("at least 8 characters"));
}

#[tokio::test]
async fn me_requires_token() {
    let request = Request::builder()
        .uri("/api/accounts/me")
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_profile_with_valid_token() {
    let request = authed_request(Method::GET, "/api/accounts/me", STUDENT_TOKEN);
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "jdoe");
}

#[tokio::test]
async fn all_users_forbidden_for_students() {
    let request = authed_request(Method::GET, "/api/accounts/all-users", STUDENT_TOKEN);
    let (status, _) = send(request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn all_users_allowed_for_admins() {
    let request = authed_request(Method::GET, "/api/accounts/all-users", ADMIN_TOKEN);
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn student_directory_is_paginated() {
    let request = authed_request(Method::GET, "/api/students", STUDENT_TOKEN);
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["total"], 1);
    assert_eq!(body["data"][0]["full_name"], "Sam Park");
}

#[tokio::test]
async fn generate_report_is_accepted() {
    let student_id = Uuid::new_v4();
    let mut request = json_request(
        Method::POST,
        "/api/students/generate-report",
        json!({"student_id": student_id, "report_type": "academic"}),
    );
    request.headers_mut().insert(
        header::AUTHORIZATION,
        format!("Bearer {}", STUDENT_TOKEN).parse().unwrap(),
    );
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["status"], "pending");
    assert!(body["task_id"].is_string());
}

#[tokio::test]
async fn report_status_is_visible_to_owner() {
    let task_id = Uuid::new_v4();
    let uri = format!("/api/students/report-status/{}", task_id);
    let request = authed_request(Method::GET, &uri, STUDENT_TOKEN);
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task_id"], task_id.to_string());
}

#[tokio::test]
async fn unknown_api_path_returns_json_404() {
    let request = authed_request(Method::GET, "/api/nope", STUDENT_TOKEN);
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn admin_delete_requires_trusted_origin() {
    let id = Uuid::new_v4();
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/admin/users/{}", id))
        .header(header::HOST, "localhost")
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .header(header::ORIGIN, "https://evil.example.com")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "UNTRUSTED_ORIGIN");
}

#[tokio::test]
async fn admin_delete_allowed_from_trusted_origin() {
    let id = Uuid::new_v4();
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/admin/users/{}", id))
        .header(header::HOST, "localhost")
        .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account deactivated");
}

#[tokio::test]
async fn admin_status_reports_backends() {
    let request = authed_request(Method::GET, "/admin/status", ADMIN_TOKEN);
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email_backend"], "console");
    assert_eq!(body["supabase"], false);
}

#[tokio::test]
async fn trailing_slash_requests_resolve() {
    // The serve command wraps the router the same way, so frontend calls
    // like POST /api/token/ reach the slash-less route declarations.
    let app = NormalizePathLayer::trim_trailing_slash().layer(test_app());

    let request = json_request(
        Method::POST,
        "/api/token/",
        json!({"username": "jdoe", "password": "SecurePass123!"}),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let request = json_request(
        Method::POST,
        "/api/accounts/login/",
        json!({"username": "jdoe", "password": "SecurePass123!"}),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn security_headers_cover_spa_pages_in_production() {
    let mut config = Config::for_tests();
    config.debug = false;
    config.render_external_hostname = Some("portal.onrender.com".to_string());
    let app = app_with_config(config);

    // An unregistered page goes through the single-page fallback
    let request = Request::builder()
        .uri("/dashboard")
        .header(header::HOST, "portal.onrender.com")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert!(headers.contains_key("strict-transport-security"));
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
}

#[tokio::test]
async fn health_endpoint_reports_database() {
    let request = Request::builder()
        .uri("/health")
        .header(header::HOST, "localhost")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
