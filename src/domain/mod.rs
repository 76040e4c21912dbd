//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! portal concepts independent of infrastructure concerns.

pub mod password;
pub mod report;
pub mod student;
pub mod user;

pub use password::Password;
pub use report::{
    Report, ReportResult, ReportStatus, ReportStatusResponse, ReportSummary, ReportType,
};
pub use student::{weighted_gpa, GpaRecord, Student, StudentDetail, StudentResponse};
pub use user::{UpdateAccount, UpdateProfile, User, UserResponse, UserRole};
