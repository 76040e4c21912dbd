//! Administrative endpoints for account management and deployment status.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{UpdateAccount, UserResponse};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Deployment status snapshot
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// Whether the database answers a ping
    pub database: bool,
    /// Active email backend ("console" or "smtp")
    pub email_backend: String,
    /// Whether Supabase storage credentials are present
    pub supabase: bool,
    /// Whether the built frontend bundle is on disk
    pub static_assets: bool,
    /// Debug mode flag
    pub debug: bool,
}

/// Create admin routes (wrapped in auth + admin + origin checks by the router)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).patch(update_user).delete(deactivate_user))
        .route("/status", get(status))
}

/// List every account
#[utoipa::path(
    get,
    path = "/admin/users/",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All accounts", body = [UserResponse]),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<UserResponse>>> {
    require_admin(&user)?;

    let accounts = state.account_service.list_accounts().await?;

    Ok(Json(accounts.into_iter().map(UserResponse::from).collect()))
}

/// One account by id
#[utoipa::path(
    get,
    path = "/admin/users/{id}/",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;

    let account = state.account_service.get_account(id).await?;

    Ok(Json(UserResponse::from(account)))
}

/// Change an account's role or active flag
#[utoipa::path(
    patch,
    path = "/admin/users/{id}/",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account id")),
    request_body = UpdateAccount,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Unknown role"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateAccount>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;

    let account = state.account_service.update_account(id, update).await?;

    Ok(Json(UserResponse::from(account)))
}

/// Deactivate an account.
///
/// Accounts are never deleted; a deactivated account cannot log in and
/// its refresh tokens stop working at the next refresh.
#[utoipa::path(
    delete,
    path = "/admin/users/{id}/",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deactivated", body = MessageResponse),
        (status = 404, description = "Account not found")
    )
)]
pub async fn deactivate_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    require_admin(&user)?;

    state.account_service.deactivate_account(id).await?;

    Ok(Json(MessageResponse::new("Account deactivated")))
}

/// Deployment status used for smoke checks after a deploy
#[utoipa::path(
    get,
    path = "/admin/status/",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Deployment status", body = StatusResponse),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<StatusResponse>> {
    require_admin(&user)?;

    let database = state.database.ping().await.is_ok();

    Ok(Json(StatusResponse {
        database,
        email_backend: state.config.email_backend.name().to_string(),
        supabase: state.config.supabase_configured(),
        static_assets: state.config.spa_index.exists(),
        debug: state.config.debug,
    }))
}
