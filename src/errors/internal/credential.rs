use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User already exists: {0}")]
    DuplicateUsername(String),

    #[error("Users cannot delete their own account")]
    SelfDeletion,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password hashing failed: {0}")]
    PasswordHashingFailed(String),
}
