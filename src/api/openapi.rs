//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{account_handler, admin_handler, student_handler, token_handler};
use crate::domain::{
    GpaRecord, ReportResult, ReportStatus, ReportStatusResponse, ReportSummary, ReportType,
    StudentDetail, StudentResponse, UpdateAccount, UpdateProfile, UserResponse, UserRole,
};
use crate::services::{RefreshedToken, TokenPair};
use crate::types::MessageResponse;

/// OpenAPI documentation for the Student Portal API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Student Portal API",
        version = "0.1.0",
        description = "JWT-authenticated backend serving the Student Portal frontend",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:8000", description = "Local development server")
    ),
    paths(
        // Token endpoints
        token_handler::obtain_token,
        token_handler::refresh_token,
        // Account endpoints
        account_handler::register,
        account_handler::login,
        account_handler::logout,
        account_handler::me,
        account_handler::update_me,
        account_handler::all_users,
        account_handler::all_students,
        account_handler::gpa_records,
        // Student endpoints
        student_handler::list_students,
        student_handler::list_peers,
        student_handler::get_student,
        student_handler::generate_report,
        student_handler::report_status,
        student_handler::list_reports,
        student_handler::download_report,
        // Admin endpoints
        admin_handler::list_users,
        admin_handler::get_user,
        admin_handler::update_user,
        admin_handler::deactivate_user,
        admin_handler::status,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            UpdateProfile,
            UpdateAccount,
            StudentResponse,
            StudentDetail,
            GpaRecord,
            ReportType,
            ReportStatus,
            ReportStatusResponse,
            ReportResult,
            ReportSummary,
            // Request/response types
            token_handler::ObtainTokenRequest,
            token_handler::RefreshTokenRequest,
            account_handler::RegisterRequest,
            account_handler::LoginRequest,
            student_handler::GenerateReportRequest,
            admin_handler::StatusResponse,
            TokenPair,
            RefreshedToken,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Tokens", description = "JWT pair issuing and refresh"),
        (name = "Accounts", description = "Registration, login and profiles"),
        (name = "Students", description = "Student directory and report generation"),
        (name = "Admin", description = "Account administration and deployment status")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token obtained from /api/token/"))
                        .build(),
                ),
            );
        }
    }
}
