//! Service container - centralized service construction and access.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, ReportGenerator, ReportService,
    StudentDirectory, StudentService,
};
use crate::config::Config;
use crate::infra::{Mailer, Repositories};

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get account service
    fn accounts(&self) -> Arc<dyn AccountService>;

    /// Get student service
    fn students(&self) -> Arc<dyn StudentService>;

    /// Get report service
    fn reports(&self) -> Arc<dyn ReportService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    student_service: Arc<dyn StudentService>,
    report_service: Arc<dyn ReportService>,
}

impl Services {
    /// Create a new service container with manually injected services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        student_service: Arc<dyn StudentService>,
        report_service: Arc<dyn ReportService>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            student_service,
            report_service,
        }
    }

    /// Create service container from a shared database connection and config
    pub fn from_connection(db: Arc<sea_orm::DatabaseConnection>, config: Config) -> Self {
        let mailer = Mailer::from_config(&config);
        let persistence = Arc::new(Repositories::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(persistence.clone(), config, mailer)),
            account_service: Arc::new(AccountManager::new(persistence.clone())),
            student_service: Arc::new(StudentDirectory::new(persistence.clone())),
            report_service: Arc::new(ReportGenerator::new(persistence)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn students(&self) -> Arc<dyn StudentService> {
        self.student_service.clone()
    }

    fn reports(&self) -> Arc<dyn ReportService> {
        self.report_service.clone()
    }
}
