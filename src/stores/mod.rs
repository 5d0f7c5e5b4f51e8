// Stores layer - Data access for the users and reports tables
pub mod credential_store;
pub mod report_store;

pub use credential_store::{CredentialStore, NewUser, UserUpdate};
pub use report_store::{ImportRow, ReportStore};
