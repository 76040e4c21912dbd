//! Allowed-hosts middleware.
//!
//! Rejects requests whose Host header is outside the configured
//! allow-list with 400, before any handler runs. Debug mode accepts any
//! host; production accepts local names, the platform suffix and the
//! deployment hostname.

use axum::{
    extract::{Request, State},
    http::header::HOST,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::errors::AppError;

/// Validate the Host header against the configured allow-list.
pub async fn allowed_hosts_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // HTTP/2 requests carry the host in the :authority pseudo-header,
    // which ends up on the request URI instead of a Host header.
    let host = request
        .headers()
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .or_else(|| request.uri().host())
        .ok_or(AppError::DisallowedHost)?;

    if !state.config.host_allowed(host) {
        tracing::warn!(%host, "request rejected: disallowed host");
        return Err(AppError::DisallowedHost);
    }

    Ok(next.run(request).await)
}
