//! Application state - Dependency injection container.
//!
//! Provides centralized access to all application services,
//! infrastructure and configuration.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AccountService, AuthService, ReportService, ServiceContainer, Services, StudentService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// Account service
    pub account_service: Arc<dyn AccountService>,
    /// Student directory service
    pub student_service: Arc<dyn StudentService>,
    /// Report generation service
    pub report_service: Arc<dyn ReportService>,
    /// Database connection
    pub database: Arc<Database>,
    /// Process configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create application state from a database connection and config.
    ///
    /// This is the recommended constructor: it wires all services through
    /// the service container.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let container = Services::from_connection(database.get_connection(), config.clone());

        Self {
            auth_service: container.auth(),
            account_service: container.accounts(),
            student_service: container.students(),
            report_service: container.reports(),
            database,
            config: Arc::new(config),
        }
    }

    /// Create application state with manually injected services
    /// (used by tests with mock services).
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        student_service: Arc<dyn StudentService>,
        report_service: Arc<dyn ReportService>,
        database: Arc<Database>,
        config: Config,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            student_service,
            report_service,
            database,
            config: Arc::new(config),
        }
    }
}
