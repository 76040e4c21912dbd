//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod gpa_record;
pub mod report;
pub mod student;
pub mod user;
