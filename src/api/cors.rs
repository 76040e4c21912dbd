//! CORS policy derived from the active configuration.

use axum::http::{header, HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;

const ALLOWED_METHODS: [Method; 6] = [
    Method::DELETE,
    Method::GET,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
];

fn allowed_headers() -> Vec<HeaderName> {
    vec![
        header::ACCEPT,
        header::ACCEPT_ENCODING,
        header::AUTHORIZATION,
        header::CONTENT_TYPE,
        header::DNT,
        header::ORIGIN,
        header::USER_AGENT,
        HeaderName::from_static("x-csrftoken"),
        HeaderName::from_static("x-requested-with"),
    ]
}

/// Build the CORS layer for the router.
///
/// In debug mode every requesting origin is mirrored back so local frontends
/// on any port can talk to the API with credentials. Outside debug mode only
/// the configured origins are allowed.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(ALLOWED_METHODS)
        .allow_headers(allowed_headers())
        .allow_credentials(true);

    if config.debug {
        layer.allow_origin(AllowOrigin::mirror_request())
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allowed_origins()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        layer.allow_origin(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_for_debug_and_release_configs() {
        let mut config = Config::for_tests();
        config.debug = true;
        let _ = cors_layer(&config);

        config.debug = false;
        let _ = cors_layer(&config);
    }
}
