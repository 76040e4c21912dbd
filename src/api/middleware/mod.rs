pub mod auth;
pub mod csrf;
pub mod hosts;
pub mod security;

pub use auth::{auth_middleware, require_admin, CurrentUser};
pub use csrf::trusted_origin_middleware;
pub use hosts::allowed_hosts_middleware;
pub use security::security_headers_middleware;
