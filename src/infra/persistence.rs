//! Persistence registry - centralized repository access.
//!
//! Services receive a single handle instead of individual repositories,
//! keeping wiring in one place. Every repository operation here is a
//! single statement, so no transaction coordinator is needed.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    ReportRepository, ReportStore, StudentRepository, StudentStore, UserRepository, UserStore,
};

/// Repository registry trait for dependency injection.
///
/// Tests implement this directly over per-repository mocks.
pub trait Persistence: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get student repository
    fn students(&self) -> Arc<dyn StudentRepository>;

    /// Get report repository
    fn reports(&self) -> Arc<dyn ReportRepository>;
}

/// Concrete registry backed by SeaORM stores
pub struct Repositories {
    user_repo: Arc<UserStore>,
    student_repo: Arc<StudentStore>,
    report_repo: Arc<ReportStore>,
}

impl Repositories {
    /// Create all stores from one shared database connection
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            student_repo: Arc::new(StudentStore::new(db.clone())),
            report_repo: Arc::new(ReportStore::new(db)),
        }
    }
}

impl Persistence for Repositories {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn students(&self) -> Arc<dyn StudentRepository> {
        self.student_repo.clone()
    }

    fn reports(&self) -> Arc<dyn ReportRepository> {
        self.report_repo.clone()
    }
}
