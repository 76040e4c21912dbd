//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - Outgoing email
//! - The persistence registry handed to services

pub mod db;
pub mod email;
pub mod persistence;
pub mod repositories;

pub use db::{Database, Migrator};
pub use email::{EmailMessage, Mailer};
pub use persistence::{Persistence, Repositories};
pub use repositories::{
    ReportRepository, ReportStore, StudentRepository, StudentStore, UserRepository, UserStore,
};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{MockReportRepository, MockStudentRepository, MockUserRepository};
