//! Account endpoints: registration, login, profile and account listings.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{GpaRecord, StudentResponse, UpdateProfile, UserResponse};
use crate::errors::AppResult;
use crate::services::{Registration, TokenPair};
use crate::types::{Created, MessageResponse, Paginated, PaginationParams};

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    /// Unique username
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    #[schema(example = "jdoe")]
    pub username: String,
    /// Account email address
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "jdoe@example.com")]
    pub email: String,
    /// Account password (minimum 8 characters)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    #[schema(example = "SecurePass123!", min_length = 8)]
    pub password: String,
    /// Display name
    #[validate(length(min = 1, message = "Full name is required"))]
    #[schema(example = "Jane Doe")]
    pub full_name: String,
}

/// Account login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    /// Account username
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "jdoe")]
    pub username: String,
    /// Account password
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Routes reachable without a token
pub fn public_account_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Routes requiring an authenticated account
pub fn protected_account_routes() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me).patch(update_me))
        .route("/all-users", get(all_users))
        .route("/students", get(all_students))
        .route("/gpa-records", get(gpa_records))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/api/accounts/register/",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .auth_service
        .register(Registration {
            username: payload.username,
            email: payload.email,
            password: payload.password,
            full_name: payload.full_name,
        })
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// Login and get a JWT token pair
#[utoipa::path(
    post,
    path = "/api/accounts/login/",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenPair),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    let pair = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(pair))
}

/// Logout acknowledgement.
///
/// Tokens are stateless and simply expire; the client discards its copy.
#[utoipa::path(
    post,
    path = "/api/accounts/logout/",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(Extension(user): Extension<CurrentUser>) -> Json<MessageResponse> {
    tracing::info!(username = %user.username, "account logged out");
    Json(MessageResponse::new("Successfully logged out"))
}

/// Profile of the authenticated account
#[utoipa::path(
    get,
    path = "/api/accounts/me/",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let account = state.account_service.get_account(user.id).await?;

    Ok(Json(UserResponse::from(account)))
}

/// Update the authenticated account's profile
#[utoipa::path(
    patch,
    path = "/api/accounts/me/",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Email already taken")
    )
)]
pub async fn update_me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(update): Json<UpdateProfile>,
) -> AppResult<Json<UserResponse>> {
    let account = state.account_service.update_profile(user.id, update).await?;

    Ok(Json(UserResponse::from(account)))
}

/// List every account (admin only)
#[utoipa::path(
    get,
    path = "/api/accounts/all-users/",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn all_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_admin(&user)?;

    let accounts = state.account_service.list_accounts().await?;

    Ok(Json(accounts.into_iter().map(UserResponse::from).collect()))
}

/// Student directory visible to any authenticated account
#[utoipa::path(
    get,
    path = "/api/accounts/students/",
    tag = "Accounts",
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
pub async fn all_students(
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

/// GPA records scoped to the caller's role.
///
/// Staff and admin accounts see every record; students see only the
/// records of their own linked student profile.
#[utoipa::path(
    get,
    path = "/api/accounts/gpa-records/",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Visible GPA records", body = [GpaRecord]),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "No student profile linked to this account")
    )
)]
pub async fn gpa_records(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<GpaRecord>>> {
    let records = state
        .student_service
        .gpa_records_for(user.id, &user.role)
        .await?;

    Ok(Json(records))
}
