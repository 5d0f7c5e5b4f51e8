use thiserror::Error;

/// Failures of the spreadsheet import pipeline
///
/// Any of these aborts the whole batch.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Could not read spreadsheet: {0}")]
    Unreadable(String),

    #[error("Spreadsheet contains no worksheet")]
    NoWorksheet,

    #[error("Spreadsheet is empty")]
    Empty,

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {row}: {cause}")]
    Row { row: usize, cause: String },
}
