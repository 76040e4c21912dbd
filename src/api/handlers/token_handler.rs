//! Token endpoints for obtaining and refreshing JWT pairs.

use axum::{extract::State, response::Json, routing::post, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{RefreshedToken, TokenPair};

/// Credentials for the token obtain endpoint
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ObtainTokenRequest {
    /// Account username
    #[validate(length(min = 1, message = "Username is required"))]
    #[schema(example = "jdoe")]
    pub username: String,
    /// Account password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "SecurePass123!")]
    pub password: String,
}

/// Refresh token payload
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequest {
    /// A valid refresh token
    #[validate(length(min = 1, message = "Refresh token is required"))]
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh: String,
}

/// Create token routes
pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(obtain_token))
        .route("/refresh", post(refresh_token))
}

/// Exchange credentials for an access/refresh token pair
#[utoipa::path(
    post,
    path = "/api/token/",
    tag = "Tokens",
    request_body = ObtainTokenRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn obtain_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ObtainTokenRequest>,
) -> AppResult<Json<TokenPair>> {
    let pair = state
        .auth_service
        .login(payload.username, payload.password)
        .await?;

    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/token/refresh/",
    tag = "Tokens",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Access token refreshed", body = RefreshedToken),
        (status = 401, description = "Invalid or expired refresh token")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshTokenRequest>,
) -> AppResult<Json<RefreshedToken>> {
    let refreshed = state.auth_service.refresh(payload.refresh).await?;

    Ok(Json(refreshed))
}
