use poem::error::ResponseError;
use poem::http::StatusCode;
use thiserror::Error;

use crate::errors::internal::{CredentialError, InternalError, ReportError};

/// Message returned with a 400 when a report submission misses a required field
pub const REQUIRED_FIELDS_MESSAGE: &str = "لطفاً فیلدهای ضروری را پر کنید.";

/// Error type returned by web handlers
///
/// Rendered by poem as a plain-text body with the matching status code.
/// Internal details are logged, never sent to the client.
#[derive(Error, Debug)]
pub enum WebError {
    /// Missing or malformed input
    #[error("{0}")]
    BadRequest(String),

    /// Referenced report or user does not exist
    #[error("{0}")]
    NotFound(String),

    /// Anything unexpected; the cause has already been logged
    #[error("خطای داخلی سرور")]
    Internal,
}

impl WebError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        WebError::BadRequest(message.into())
    }
}

impl ResponseError for WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<InternalError> for WebError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Report(ReportError::Validation(detail)) => {
                tracing::debug!("Rejected report submission: {}", detail);
                WebError::BadRequest(REQUIRED_FIELDS_MESSAGE.to_string())
            }
            InternalError::Report(ReportError::NotFound(id)) => {
                WebError::NotFound(format!("گزارش {} یافت نشد.", id))
            }
            InternalError::Credential(CredentialError::UserNotFound(id)) => {
                WebError::NotFound(format!("کاربر {} یافت نشد.", id))
            }
            other => {
                tracing::error!("Request failed: {}", other);
                WebError::Internal
            }
        }
    }
}
