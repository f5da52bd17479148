//! Per-process report service

use crate::builder::ReportBuilder;
use crate::config::ReportConfig;
use crate::document::{ExtractedDocument, ReportDocument};
use crate::engine::{SpreadsheetEngine, XlsxEngine};
use crate::error::Result;
use crate::extractor::ReportExtractor;
use crate::outcome::BuiltReport;

/// Entry point for build and parse requests
///
/// The service holds only its configuration and engine. Every request works
/// on its own workbook, so one service can be shared between threads.
#[derive(Debug, Clone)]
pub struct ReportService<E = XlsxEngine> {
    config: ReportConfig,
    engine: E,
}

impl ReportService<XlsxEngine> {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            engine: XlsxEngine,
        }
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

impl<E: SpreadsheetEngine> ReportService<E> {
    pub fn with_engine(config: ReportConfig, engine: E) -> Self {
        Self { config, engine }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Build a report from a parsed document
    pub fn build(&self, document: &ReportDocument) -> Result<BuiltReport> {
        ReportBuilder::new(&self.config).build(document, &self.engine)
    }

    /// Build a report from JSON text
    pub fn build_json(&self, json: &str) -> Result<BuiltReport> {
        let document = ReportDocument::from_json(json)?;
        self.build(&document)
    }

    /// Load a spreadsheet and extract its sheets
    pub fn parse(&self, bytes: &[u8]) -> Result<ExtractedDocument> {
        let workbook = self.engine.load(bytes)?;
        Ok(ReportExtractor::extract(&workbook))
    }
}
