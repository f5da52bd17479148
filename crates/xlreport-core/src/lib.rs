//! # xlreport-core
//!
//! Core data structures for the xlreport spreadsheet report toolkit.
//!
//! This crate provides the in-memory spreadsheet model the codecs work on:
//! - [`CellValue`] - Cell values (numbers, strings, booleans, errors, loaded formulas)
//! - [`CellAddress`] and [`CellRange`] - Cell addressing and ranges
//! - [`Style`] - Cell formatting (font, fill, border, alignment, number format)
//! - [`ConditionalFormatRule`] - Conditional formatting rules
//! - [`Workbook`], [`Worksheet`] - The document structures
//!
//! ## Example
//!
//! ```rust
//! use xlreport_core::{CellRange, CellValue, Style, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! sheet.set_cell_value("A1", "Ventas").unwrap();
//! sheet.set_cell_value("B1", 42.0).unwrap();
//! sheet.set_cell_style("A1", &Style::new().bold(true)).unwrap();
//! sheet.merge_cells(&CellRange::parse("A1:B1").unwrap()).unwrap();
//!
//! assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("Ventas"));
//! assert!(sheet.get_value("B1").unwrap().is_empty());
//! ```

pub mod cell;
pub mod conditional_format;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

pub use cell::{CellAddress, CellData, CellError, CellRange, CellValue};
pub use conditional_format::{CfOperator, CfRuleType, CfValue, CfValueType, ConditionalFormatRule};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, PatternType, Style, StylePool, Underline,
    VerticalAlignment,
};

/// Maximum number of rows in a worksheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
