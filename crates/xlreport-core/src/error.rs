//! Error types for xlreport-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the in-memory spreadsheet model
#[derive(Debug, Error)]
pub enum Error {
    /// Address text did not resolve to a cell
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Range text did not resolve to a rectangle of cells
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    #[error("Row index {0} out of bounds (max: {1})")]
    RowOutOfBounds(u32, u32),

    #[error("Column index {0} out of bounds (max: {1})")]
    ColumnOutOfBounds(u16, u16),

    #[error("Sheet index {0} out of bounds (count: {1})")]
    SheetOutOfBounds(usize, usize),

    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// Sheet name is empty, too long or contains a forbidden character
    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("Sheet name already exists: {0}")]
    DuplicateSheetName(String),

    /// A new merge overlaps a merge that is already registered
    #[error("Range {0} overlaps an existing merged region")]
    MergedCellConflict(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }
}
