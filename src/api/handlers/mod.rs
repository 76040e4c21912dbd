pub mod account_handler;
pub mod admin_handler;
pub mod student_handler;
pub mod token_handler;
