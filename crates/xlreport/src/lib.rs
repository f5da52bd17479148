//! # xlreport
//!
//! Builds spreadsheet reports from JSON documents and extracts JSON
//! documents from spreadsheets.
//!
//! The build direction accepts cell values and styles, merged ranges,
//! conditional formatting rules and charts. The parse direction reports
//! values, merged ranges and the style attributes that are actually set on
//! each cell, so a round trip keeps values but only a subset of styles.
//!
//! ## Example
//!
//! ```rust
//! use xlreport::{ReportConfig, ReportService};
//!
//! let service = ReportService::new(ReportConfig::default());
//! let report = service
//!     .build_json(r#"{
//!         "analysisData": [[
//!             {"address": "A1", "value": "Ventas", "style": {"font": {"bold": true}}},
//!             {"address": "B1", "value": 1250}
//!         ]],
//!         "charts": [{"type": "radar", "data_range": "B1:B1"}]
//!     }"#)
//!     .unwrap();
//! assert_eq!(report.warnings.len(), 1);
//!
//! let document = service.parse(&report.bytes).unwrap();
//! let sheet = &document.sheets[0];
//! assert_eq!(sheet.cell("B1").unwrap().value, 1250);
//! ```

pub mod builder;
pub mod chart;
pub mod conditional;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod outcome;
pub mod service;
pub mod style_codec;

pub use builder::{PopulatedReport, ReportBuilder};
pub use chart::ChartCodec;
pub use conditional::ConditionalFormatCodec;
pub use config::ReportConfig;
pub use document::{
    AlignmentSpec, BorderSideSpec, BorderSpec, CellInfo, CellSpec, ChartSpec, ExtractedDocument,
    ExtractedSheet, FillSpec, FontSpec, ReportDocument, RuleSpec, StyleSpec,
};
pub use engine::{SpreadsheetEngine, XlsxEngine};
pub use error::{ReportError, Result, StyleSpecError};
pub use extractor::ReportExtractor;
pub use outcome::{
    BuildWarning, BuiltReport, ChartOutcome, RuleOutcome, SkipReason, WarningSource,
};
pub use service::ReportService;
pub use style_codec::StyleCodec;

pub use xlreport_chart as chart_model;
pub use xlreport_core as model;
pub use xlreport_xlsx::XlsxError;
