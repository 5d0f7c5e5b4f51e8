use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    /// A required field is empty or outside the fixed catalog
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Report not found: {0}")]
    NotFound(i32),

    /// Bulk operation invoked with nothing selected
    #[error("No reports selected")]
    EmptySelection,
}

impl ReportError {
    pub fn missing_field(field: &str) -> Self {
        ReportError::Validation(format!("{} is required", field))
    }
}
