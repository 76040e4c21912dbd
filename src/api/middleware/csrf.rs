//! Cross-origin request check for the admin section.
//!
//! JWT API routes are exempt (a Bearer header cannot be attached by a
//! cross-site form), but the admin section additionally requires that
//! unsafe-method requests carrying an Origin header come from a trusted
//! origin.

use axum::{
    extract::{Request, State},
    http::header::ORIGIN,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::errors::AppError;

/// Reject unsafe-method requests from untrusted origins.
pub async fn trusted_origin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !request.method().is_safe() {
        if let Some(origin) = request.headers().get(ORIGIN).and_then(|o| o.to_str().ok()) {
            let trusted = state.config.csrf_trusted_origins();
            if !trusted.iter().any(|t| t == origin) {
                tracing::warn!(%origin, "request rejected: untrusted origin");
                return Err(AppError::UntrustedOrigin);
            }
        }
    }

    Ok(next.run(request).await)
}
