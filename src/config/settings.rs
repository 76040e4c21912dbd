//! Application settings loaded from environment variables.
//!
//! Everything the process needs is assembled once at startup: security
//! keys, database URL, host/CORS/CSRF allow-lists, JWT lifetimes, static
//! asset paths and email delivery. The `DEBUG` flag selects between the
//! permissive development branch and the locked-down production branch.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_ACCESS_TOKEN_HOURS, DEFAULT_DATABASE_URL, DEFAULT_MEDIA_ROOT,
    DEFAULT_REFRESH_TOKEN_DAYS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SPA_INDEX,
    DEFAULT_STATIC_DIR, DEV_TRUSTED_ORIGINS, MIN_SECRET_KEY_LENGTH, PRODUCTION_HOSTS,
    RENDER_HOST_SUFFIX,
};

/// How outgoing email is delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmailBackend {
    /// Log messages instead of sending them (development)
    Console,
    /// Deliver via the configured SMTP relay (production)
    Smtp(SmtpSettings),
}

impl EmailBackend {
    /// Short backend label used in status output.
    pub fn name(&self) -> &'static str {
        match self {
            EmailBackend::Console => "console",
            EmailBackend::Smtp(_) => "smtp",
        }
    }
}

/// SMTP relay settings, read from the EMAIL_* variables.
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl std::fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("use_tls", &self.use_tls)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    secret_key: String,
    pub debug: bool,
    pub database_url: String,
    pub render_external_hostname: Option<String>,
    pub frontend_origin: Option<String>,
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
    pub server_host: String,
    pub server_port: u16,
    pub static_dir: PathBuf,
    pub spa_index: PathBuf,
    pub media_root: PathBuf,
    pub email_backend: EmailBackend,
    pub supabase_url: Option<String>,
    supabase_key: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("secret_key", &"[REDACTED]")
            .field("debug", &self.debug)
            .field("database_url", &"[REDACTED]")
            .field("render_external_hostname", &self.render_external_hostname)
            .field("frontend_origin", &self.frontend_origin)
            .field("access_token_hours", &self.access_token_hours)
            .field("refresh_token_days", &self.refresh_token_days)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("static_dir", &self.static_dir)
            .field("supabase_key", &"[REDACTED]")
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics if SECRET_KEY is unset in production or shorter than the
    /// minimum length (security requirement).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let debug = env::var("DEBUG")
            .ok()
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(true);

        let secret_key = env::var("SECRET_KEY").unwrap_or_else(|_| {
            if debug {
                tracing::warn!("SECRET_KEY not set, using insecure default for development");
                "insecure-dev-secret-key-change-me-in-prod!!".to_string()
            } else {
                panic!("SECRET_KEY environment variable must be set in production");
            }
        });

        if secret_key.len() < MIN_SECRET_KEY_LENGTH {
            panic!(
                "SECRET_KEY must be at least {} characters long",
                MIN_SECRET_KEY_LENGTH
            );
        }

        let email_backend = if debug {
            EmailBackend::Console
        } else {
            EmailBackend::Smtp(SmtpSettings::from_env())
        };

        Self {
            secret_key,
            debug,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            render_external_hostname: env::var("RENDER_EXTERNAL_HOSTNAME").ok(),
            frontend_origin: env::var("FRONTEND_ORIGIN").ok(),
            access_token_hours: env::var("ACCESS_TOKEN_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_ACCESS_TOKEN_HOURS),
            refresh_token_days: env::var("REFRESH_TOKEN_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REFRESH_TOKEN_DAYS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            static_dir: env::var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR)),
            spa_index: env::var("SPA_INDEX")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_SPA_INDEX)),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MEDIA_ROOT)),
            email_backend,
            supabase_url: env::var("SUPABASE_URL").ok(),
            supabase_key: env::var("SUPABASE_KEY").ok(),
        }
    }

    /// Get secret key bytes for token signing/verification.
    pub fn secret_key_bytes(&self) -> &[u8] {
        self.secret_key.as_bytes()
    }

    /// Check whether a Host header value is acceptable.
    ///
    /// Any host is accepted in debug mode. In production the host must be
    /// a known local name, end in the platform suffix, or match the
    /// deployment hostname.
    pub fn host_allowed(&self, host: &str) -> bool {
        if self.debug {
            return true;
        }

        // Strip an optional port before matching
        let name = host.rsplit_once(':').map_or(host, |(h, _)| h);

        PRODUCTION_HOSTS.contains(&name)
            || name.ends_with(RENDER_HOST_SUFFIX)
            || self
                .render_external_hostname
                .as_deref()
                .is_some_and(|h| h == name)
    }

    /// Origins allowed for cross-origin requests in production.
    pub fn cors_allowed_origins(&self) -> Vec<String> {
        let mut origins = Vec::new();
        if let Some(front) = &self.frontend_origin {
            origins.push(front.clone());
        }
        if let Some(host) = &self.render_external_hostname {
            origins.push(format!("https://{host}"));
        }
        origins
    }

    /// Origins trusted for unsafe-method requests to the admin section.
    pub fn csrf_trusted_origins(&self) -> Vec<String> {
        if self.debug {
            DEV_TRUSTED_ORIGINS.iter().map(|o| o.to_string()).collect()
        } else {
            self.cors_allowed_origins()
        }
    }

    /// Whether the Supabase integration has credentials configured.
    pub fn supabase_configured(&self) -> bool {
        self.supabase_url.is_some() && self.supabase_key.is_some()
    }

    /// Fixed configuration for tests, independent of the environment.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests() -> Self {
        Self {
            secret_key: "test-secret-key-for-unit-tests-32ch!".to_string(),
            debug: true,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            render_external_hostname: None,
            frontend_origin: None,
            access_token_hours: DEFAULT_ACCESS_TOKEN_HOURS,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            spa_index: PathBuf::from(DEFAULT_SPA_INDEX),
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            email_backend: EmailBackend::Console,
            supabase_url: None,
            supabase_key: None,
        }
    }
}

impl SmtpSettings {
    fn from_env() -> Self {
        let username = env::var("EMAIL_HOST_USER").unwrap_or_default();
        Self {
            host: env::var("EMAIL_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            port: env::var("EMAIL_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(587),
            use_tls: env::var("EMAIL_USE_TLS")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(true),
            password: env::var("EMAIL_HOST_PASSWORD").unwrap_or_default(),
            from_address: env::var("DEFAULT_FROM_EMAIL").unwrap_or_else(|_| username.clone()),
            username,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(debug: bool) -> Config {
        Config {
            secret_key: "test-secret-key-for-unit-tests-32ch!".to_string(),
            debug,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            render_external_hostname: Some("portal.onrender.com".to_string()),
            frontend_origin: Some("https://portal.example.com".to_string()),
            access_token_hours: DEFAULT_ACCESS_TOKEN_HOURS,
            refresh_token_days: DEFAULT_REFRESH_TOKEN_DAYS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            spa_index: PathBuf::from(DEFAULT_SPA_INDEX),
            media_root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            email_backend: EmailBackend::Console,
            supabase_url: None,
            supabase_key: None,
        }
    }

    #[test]
    fn debug_mode_allows_any_host() {
        let config = test_config(true);
        assert!(config.host_allowed("evil.example.com"));
        assert!(config.host_allowed("localhost:8000"));
    }

    #[test]
    fn production_restricts_hosts() {
        let config = test_config(false);
        assert!(config.host_allowed("localhost"));
        assert!(config.host_allowed("127.0.0.1:8000"));
        assert!(config.host_allowed("anything.onrender.com"));
        assert!(config.host_allowed("portal.onrender.com"));
        assert!(!config.host_allowed("evil.example.com"));
    }

    #[test]
    fn production_cors_origins_include_deployment() {
        let config = test_config(false);
        let origins = config.cors_allowed_origins();
        assert!(origins.contains(&"https://portal.example.com".to_string()));
        assert!(origins.contains(&"https://portal.onrender.com".to_string()));
    }

    #[test]
    fn debug_csrf_origins_cover_dev_servers() {
        let config = test_config(true);
        let origins = config.csrf_trusted_origins();
        assert!(origins.contains(&"http://localhost:5173".to_string()));
    }

    #[test]
    fn config_debug_redacts_secrets() {
        let rendered = format!("{:?}", test_config(true));
        assert!(!rendered.contains("test-secret-key"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
