use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("Backup file must have a .db extension: {0}")]
    InvalidFileType(String),

    #[error("Backup file is not a usable SQLite database: {0}")]
    NotADatabase(String),

    #[error("Backup I/O error: {operation} failed: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl BackupError {
    pub fn io(operation: &str, source: std::io::Error) -> Self {
        BackupError::Io { operation: operation.to_string(), source }
    }
}
