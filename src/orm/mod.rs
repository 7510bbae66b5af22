pub mod clients;
pub mod error_reports;
pub mod log_reports;
pub mod msp_reports;
pub mod reports;
pub mod users;
