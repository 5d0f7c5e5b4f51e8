use thiserror::Error;

pub mod authorization;
pub mod backup;
pub mod credential;
pub mod database;
pub mod import;
pub mod report;

pub use authorization::AuthorizationError;
pub use backup::BackupError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use import::ImportError;
pub use report::ReportError;

/// Internal error type for store and service operations
///
/// Infrastructure errors (database, crypto, parsing) are shared, domain errors
/// are grouped per store. Never rendered directly: the web layer converts it
/// into a `WebError`, a flash message or a redirect.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Backup(#[from] BackupError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation { operation: operation.to_string(), source })
    }

    pub fn transaction_begin(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionBegin { source })
    }

    pub fn transaction_commit(source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::TransactionCommit { source })
    }

    pub fn parse(value_type: &str, message: impl Into<String>) -> InternalError {
        InternalError::Parse { value_type: value_type.to_string(), message: message.into() }
    }

    pub fn crypto(operation: &str, message: impl Into<String>) -> InternalError {
        InternalError::Crypto { operation: operation.to_string(), message: message.into() }
    }
}
