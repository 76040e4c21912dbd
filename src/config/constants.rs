//! Application-wide constants
//!
//! Centralized location for magic values to improve maintainability.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Maximum allowed items per page to prevent excessive queries
pub const MAX_PAGE_SIZE: u64 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

// =============================================================================
// Authentication & Security
// =============================================================================

/// Access token lifetime in hours
pub const DEFAULT_ACCESS_TOKEN_HOURS: i64 = 24;

/// Refresh token lifetime in days
pub const DEFAULT_REFRESH_TOKEN_DAYS: i64 = 7;

/// Minimum secret key length (security requirement)
pub const MIN_SECRET_KEY_LENGTH: usize = 32;

/// Authorization header prefix for Bearer tokens
pub const BEARER_TOKEN_PREFIX: &str = "Bearer ";

/// Claim value identifying an access token
pub const TOKEN_TYPE_ACCESS: &str = "access";

/// Claim value identifying a refresh token
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to newly registered accounts
pub const ROLE_STUDENT: &str = "student";

/// Staff role: can view all student records
pub const ROLE_STAFF: &str = "staff";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_STUDENT, ROLE_STAFF, ROLE_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// =============================================================================
// Database
// =============================================================================

/// Default database URL: local SQLite file, created on demand
pub const DEFAULT_DATABASE_URL: &str = "sqlite://db.sqlite3?mode=rwc";

// =============================================================================
// Hosts (production allow-list)
// =============================================================================

/// Hosts always accepted in production
pub const PRODUCTION_HOSTS: &[&str] = &["localhost", "127.0.0.1"];

/// Host suffix for the Render deployment platform
pub const RENDER_HOST_SUFFIX: &str = ".onrender.com";

// =============================================================================
// Frontend build artifacts
// =============================================================================

/// Directory holding the Vite asset bundle, served under /assets
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist/assets";

/// SPA entry point served by the catch-all route
pub const DEFAULT_SPA_INDEX: &str = "frontend/dist/index.html";

/// Uploaded media directory, served under /media in debug mode
pub const DEFAULT_MEDIA_ROOT: &str = "media";

/// Origins trusted for cross-origin unsafe requests during development
/// (Vite dev server, CRA dev server, local backend)
pub const DEV_TRUSTED_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
    "http://localhost:8000",
    "http://127.0.0.1:8000",
];

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: u64 = 8;

// =============================================================================
// Reports
// =============================================================================

/// Progress value reported once a report run completes
pub const REPORT_PROGRESS_DONE: i16 = 100;
