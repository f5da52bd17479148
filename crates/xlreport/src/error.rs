//! Error types for report building and extraction

use thiserror::Error;
use xlreport_xlsx::XlsxError;

/// Result type alias using [`ReportError`]
pub type Result<T> = std::result::Result<T, ReportError>;

/// Failures that abort a whole build or parse request
///
/// Skipped conditional rules and charts are not errors; they are reported
/// as [`BuildWarning`](crate::BuildWarning)s.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The input is not a usable report document
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A cell's style (or address) cannot be applied
    #[error("Invalid style for cell {address}: {reason}")]
    InvalidStyleSpec { address: String, reason: String },

    /// The configuration cannot produce a workbook
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serializing or loading the spreadsheet failed
    #[error("Spreadsheet engine failure: {0}")]
    Engine(#[from] XlsxError),
}

impl ReportError {
    pub(crate) fn malformed<S: Into<String>>(msg: S) -> Self {
        ReportError::MalformedDocument(msg.into())
    }
}

/// A style object that cannot be turned into a cell or differential style
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct StyleSpecError(pub String);

impl From<serde_json::Error> for StyleSpecError {
    fn from(e: serde_json::Error) -> Self {
        StyleSpecError(e.to_string())
    }
}
