//! The spreadsheet engine seam
//!
//! Builders and extractors work on the in-memory [`Workbook`]; an engine
//! turns that model into file bytes and back.

use std::io::Cursor;

use xlreport_chart::Charts;
use xlreport_core::Workbook;
use xlreport_xlsx::{XlsxReader, XlsxResult, XlsxWriter};

/// Serialization and loading of workbooks
pub trait SpreadsheetEngine {
    /// Serialize a workbook and its charts
    fn serialize(&self, workbook: &Workbook, charts: &Charts) -> XlsxResult<Vec<u8>>;

    /// Load a workbook; formula cells keep their cached results
    fn load(&self, bytes: &[u8]) -> XlsxResult<Workbook>;
}

/// Office Open XML (`.xlsx`) engine
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxEngine;

impl SpreadsheetEngine for XlsxEngine {
    fn serialize(&self, workbook: &Workbook, charts: &Charts) -> XlsxResult<Vec<u8>> {
        XlsxWriter::to_bytes(workbook, charts)
    }

    fn load(&self, bytes: &[u8]) -> XlsxResult<Workbook> {
        XlsxReader::read(Cursor::new(bytes))
    }
}
