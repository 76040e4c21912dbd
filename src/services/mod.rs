//! Services layer - Application use cases and business logic.

mod account_service;
mod auth_service;
mod container;
mod report_service;
mod student_service;

pub use account_service::{AccountManager, AccountService};
pub use auth_service::{
    AuthService, Authenticator, Claims, RefreshedToken, Registration, TokenPair,
};
pub use container::{ServiceContainer, Services};
pub use report_service::{render_report, ReportGenerator, ReportService};
pub use student_service::{StudentDirectory, StudentService};
