// Request and response shapes at the HTTP boundary
pub mod common;
pub mod forms;

pub use common::HealthResponse;
pub use forms::{LoginForm, ReportFilterQuery, ReportForm, UserForm};
