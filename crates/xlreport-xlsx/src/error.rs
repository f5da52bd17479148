//! XLSX error types

use thiserror::Error;

/// Result type for XLSX operations
pub type XlsxResult<T> = std::result::Result<T, XlsxError>;

/// Errors that can occur while reading or writing a package
#[derive(Debug, Error)]
pub enum XlsxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The archive is not a spreadsheet package
    #[error("Invalid XLSX format: {0}")]
    InvalidFormat(String),

    /// A part referenced by the package is not in the archive
    #[error("Missing required part: {0}")]
    MissingPart(String),

    /// A part's content could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// The model rejected a loaded value (bad sheet name, out of range cell)
    #[error("Core error: {0}")]
    Core(#[from] xlreport_core::Error),
}
