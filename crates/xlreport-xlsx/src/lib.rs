//! # xlreport-xlsx
//!
//! XLSX (Office Open XML) reader and writer for the xlreport model.
//!
//! The writer emits cells, styles, merges, column widths, conditional
//! formatting and native charts. The reader loads everything except charts.

pub mod error;
pub mod reader;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
