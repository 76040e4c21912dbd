//! Application route configuration.

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    middleware,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::cors::cors_layer;
use super::handlers::{
    account_handler::{protected_account_routes, public_account_routes},
    admin_handler::admin_routes,
    student_handler::student_routes,
    token_handler::token_routes,
};
use super::middleware::{
    allowed_hosts_middleware, auth_middleware, security_headers_middleware,
    trusted_origin_middleware,
};
use super::openapi::ApiDoc;
use super::AppState;
use crate::errors::AppError;

/// Create the application router with all routes configured.
///
/// Trailing-slash normalization is applied by the serve command, which
/// wraps this router in a NormalizePath layer, so every route here is
/// declared without a trailing slash.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(api_root))
        .nest("/token", token_routes())
        .nest(
            "/accounts",
            public_account_routes().merge(protected_account_routes().route_layer(
                middleware::from_fn_with_state(state.clone(), auth_middleware),
            )),
        )
        .nest(
            "/students",
            student_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        );

    // Unsafe-method requests to the admin section must carry a trusted
    // Origin header in addition to a valid admin token.
    let admin = admin_routes()
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            trusted_origin_middleware,
        ));

    let mut router = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .nest("/admin", admin)
        // Built frontend bundle; ServeDir answers 404 until the bundle exists
        .nest_service("/assets", ServeDir::new(&state.config.static_dir));

    // User uploads are served by the app itself only during development
    if state.config.debug {
        router = router.nest_service("/media", ServeDir::new(&state.config.media_root));
    }

    // The fallback is registered before the security-header layer; a layer
    // only wraps what the router already knows, and the frontend pages it
    // serves need those headers as much as the named routes do.
    router = router.fallback(spa_fallback);

    if !state.config.debug {
        router = router.layer(middleware::from_fn(security_headers_middleware));
    }

    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            allowed_hosts_middleware,
        ))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Landing page with links to the main entry points
async fn home() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head><title>Student Portal API</title></head>
<body>
<h1>Student Portal API</h1>
<p>The backend is running. Useful entry points:</p>
<ul>
<li><a href="/api/">/api/</a> - API root</li>
<li><a href="/api/token/">/api/token/</a> - obtain a JWT pair</li>
<li><a href="/api/students/">/api/students/</a> - students</li>
<li><a href="/swagger-ui/">/swagger-ui/</a> - interactive documentation</li>
<li><a href="/health">/health</a> - service health</li>
</ul>
</body>
</html>"#,
    )
}

/// API root body, mirroring the section list on the landing page
#[derive(Serialize)]
struct ApiIndex {
    token: &'static str,
    accounts: &'static str,
    students: &'static str,
    docs: &'static str,
}

/// API root listing the mounted sections
async fn api_root() -> Json<ApiIndex> {
    Json(ApiIndex {
        token: "/api/token/",
        accounts: "/api/accounts/",
        students: "/api/students/",
        docs: "/swagger-ui/",
    })
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match state.database.ping().await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy",
                database: "healthy",
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                database: "unhealthy",
                error: Some(e.to_string()),
            }),
        ),
    }
}

/// Serve the single-page frontend for any path the router does not know.
///
/// API and admin paths still get a JSON 404 so the frontend's error
/// handling sees a structured body instead of its own index page.
async fn spa_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    if path.starts_with("/api") || path.starts_with("/admin") {
        return AppError::NotFound.into_response();
    }

    match tokio::fs::read_to_string(&state.config.spa_index).await {
        Ok(index) => Html(index).into_response(),
        Err(_) => {
            tracing::debug!(%path, "frontend bundle missing, returning 404");
            AppError::NotFound.into_response()
        }
    }
}
