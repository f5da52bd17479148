//! Report building
//!
//! The order of the steps is fixed: cell values and styles, merges,
//! conditional rules, charts, column widths, serialization. Cell styles and
//! merges are trusted input and abort the build when they fail; rules and
//! charts are decoration and are skipped with a warning.

use std::collections::BTreeMap;

use crate::chart::ChartCodec;
use crate::conditional::ConditionalFormatCodec;
use crate::config::ReportConfig;
use crate::document::ReportDocument;
use crate::engine::SpreadsheetEngine;
use crate::error::{ReportError, Result};
use crate::outcome::{BuildWarning, BuiltReport, ChartOutcome, RuleOutcome, SkipReason, WarningSource};
use crate::style_codec::StyleCodec;
use xlreport_chart::Charts;
use xlreport_core::{CellAddress, CellRange, Workbook, Worksheet};

/// A populated workbook that has not been serialized yet
#[derive(Debug)]
pub struct PopulatedReport {
    pub workbook: Workbook,
    pub charts: Charts,
    pub warnings: Vec<BuildWarning>,
}

/// Turns a [`ReportDocument`] into a single-sheet workbook
pub struct ReportBuilder<'a> {
    config: &'a ReportConfig,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Populate and serialize
    pub fn build<E: SpreadsheetEngine>(
        &self,
        document: &ReportDocument,
        engine: &E,
    ) -> Result<BuiltReport> {
        let report = self.populate(document)?;
        let bytes = engine.serialize(&report.workbook, &report.charts)?;
        log::debug!(
            "serialized report: {} bytes, {} warnings",
            bytes.len(),
            report.warnings.len()
        );
        Ok(BuiltReport {
            bytes,
            warnings: report.warnings,
        })
    }

    /// Populate a fresh workbook without serializing it
    pub fn populate(&self, document: &ReportDocument) -> Result<PopulatedReport> {
        let mut workbook = Workbook::empty();
        let sheet_index = workbook
            .add_worksheet_with_name(&self.config.sheet_title)
            .map_err(|e| ReportError::InvalidConfig(format!("sheet_title: {e}")))?;
        let sheet = workbook
            .worksheet_mut(sheet_index)
            .ok_or_else(|| ReportError::InvalidConfig("report sheet was not created".into()))?;

        let mut warnings = Vec::new();
        self.write_cells(sheet, document)?;
        self.apply_merges(sheet, document)?;
        self.apply_rules(sheet, document, &mut warnings);
        let charts = self.build_charts(sheet_index, sheet.name(), document, &mut warnings);
        self.size_columns(sheet);

        Ok(PopulatedReport {
            workbook,
            charts,
            warnings,
        })
    }

    fn write_cells(&self, sheet: &mut Worksheet, document: &ReportDocument) -> Result<()> {
        let mut written = 0usize;
        for cell in document.cells() {
            let invalid = |reason: String| ReportError::InvalidStyleSpec {
                address: cell.address.clone(),
                reason,
            };
            let addr = CellAddress::parse(&cell.address).map_err(|e| invalid(e.to_string()))?;
            sheet
                .set_cell_value_at(addr.row, addr.col, cell.value.clone())
                .map_err(|e| invalid(e.to_string()))?;
            if let Some(style) = &cell.style {
                StyleCodec::apply_style(sheet, addr.row, addr.col, style)
                    .map_err(|e| invalid(e.0))?;
            }
            written += 1;
        }
        log::debug!("wrote {written} cells");
        Ok(())
    }

    fn apply_merges(&self, sheet: &mut Worksheet, document: &ReportDocument) -> Result<()> {
        for reference in &document.merge_cells {
            let range = CellRange::parse_unqualified(reference)
                .map(|range| range.to_relative())
                .and_then(|range| sheet.merge_cells(&range).map(|()| range))
                .map_err(|e| {
                    ReportError::malformed(format!("merge range '{reference}': {e}"))
                })?;
            log::debug!("merged {range}");
        }
        Ok(())
    }

    fn apply_rules(
        &self,
        sheet: &mut Worksheet,
        document: &ReportDocument,
        warnings: &mut Vec<BuildWarning>,
    ) {
        let codec = ConditionalFormatCodec::new(self.config);
        for (index, entry) in document.conditional_rules.iter().enumerate() {
            match codec.build_rule_value(entry) {
                RuleOutcome::Applied(rule) => sheet.add_conditional_format(rule),
                RuleOutcome::Skipped(reason) => {
                    warnings.push(skipped(WarningSource::ConditionalRule, index, reason))
                }
            }
        }
        log::debug!(
            "applied {} of {} conditional rules",
            sheet.conditional_formats().len(),
            document.conditional_rules.len()
        );
    }

    fn build_charts(
        &self,
        sheet_index: usize,
        sheet_name: &str,
        document: &ReportDocument,
        warnings: &mut Vec<BuildWarning>,
    ) -> Charts {
        let codec = ChartCodec::new(self.config, sheet_name);
        let mut charts = Charts::new();
        for (index, entry) in document.charts.iter().enumerate() {
            match codec.build_chart_value(entry) {
                ChartOutcome::Added(chart) => charts.add(sheet_index, chart),
                ChartOutcome::Skipped(reason) => {
                    warnings.push(skipped(WarningSource::Chart, index, reason))
                }
            }
        }
        log::debug!("added {} of {} charts", charts.len(), document.charts.len());
        charts
    }

    fn size_columns(&self, sheet: &mut Worksheet) {
        let longest = longest_values(sheet);
        for (&col, &len) in &longest {
            sheet.set_column_width(col, self.config.column_width(len));
        }
        log::debug!("sized {} columns", longest.len());
    }
}

fn skipped(kind: WarningSource, index: usize, reason: SkipReason) -> BuildWarning {
    let warning = BuildWarning::new(kind, index, reason);
    log::warn!("{warning}");
    warning
}

/// Longest displayed value per column over the grid from `A1`
///
/// Non-anchor merge members are left out; a column made only of merge
/// members gets no entry.
pub fn longest_values(sheet: &Worksheet) -> BTreeMap<u16, usize> {
    let mut longest = BTreeMap::new();
    let Some(grid) = sheet.dimension() else {
        return longest;
    };

    for row in grid.start.row..=grid.end.row {
        for col in grid.start.col..=grid.end.col {
            if sheet.is_merge_member(row, col) {
                continue;
            }
            let len = sheet.cell_at(row, col).map_or(0, |c| c.value.display_len());
            let entry = longest.entry(col).or_insert(0);
            *entry = len.max(*entry);
        }
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::CellSpec;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xlreport_core::CellValue;

    fn document(value: serde_json::Value) -> ReportDocument {
        ReportDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_populate_writes_values_styles_and_widths() {
        let config = ReportConfig::default();
        let doc = document(json!({
            "analysisData": [
                [{"address": "A1", "value": "Producto", "style": {"font": {"bold": true}}},
                 {"address": "B1", "value": 1234.5}],
                [{"address": "A2", "value": true}, {"address": "B2", "value": null}]
            ]
        }));

        let report = ReportBuilder::new(&config).populate(&doc).unwrap();
        let sheet = report.workbook.worksheet(0).unwrap();

        assert_eq!(sheet.name(), "Reporte Generado");
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("Producto"));
        assert!(sheet.cell_style("A1").unwrap().unwrap().font.bold);
        assert_eq!(sheet.get_value("A2").unwrap(), CellValue::Boolean(true));
        assert_eq!(sheet.column_width(0), Some(10.0));
        assert_eq!(sheet.column_width(1), Some(8.0));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_addresses_overwrite_in_order() {
        let config = ReportConfig::default();
        let doc = ReportDocument {
            rows: vec![vec![CellSpec::new("C3", "first"), CellSpec::new("C3", 2.0)]],
            ..ReportDocument::default()
        };
        let report = ReportBuilder::new(&config).populate(&doc).unwrap();
        assert_eq!(
            report.workbook.worksheet(0).unwrap().get_value("C3").unwrap(),
            CellValue::Number(2.0)
        );
    }

    #[test]
    fn test_repeated_address_styles_accumulate() {
        let config = ReportConfig::default();
        let doc = document(json!({
            "analysisData": [[
                {"address": "A1", "value": "x", "style": {"fill": {"pattern": "solid", "start_color": "FFFF00"}}},
                {"address": "A1", "value": "y", "style": {"font": {"bold": true}}}
            ]],
            "mergeCells": ["$C$1:$D$1"]
        }));

        let report = ReportBuilder::new(&config).populate(&doc).unwrap();
        let sheet = report.workbook.worksheet(0).unwrap();
        assert_eq!(sheet.get_value("A1").unwrap(), CellValue::string("y"));
        let style = sheet.cell_style("A1").unwrap().unwrap();
        assert!(style.font.bold);
        assert!(style.fill.start_color.is_some());
        assert_eq!(sheet.merged_regions()[0].to_string(), "C1:D1");
    }

    #[test]
    fn test_merge_members_do_not_count_for_width() {
        let config = ReportConfig::default();
        let doc = document(json!({
            "analysisData": [[
                {"address": "A1", "value": "Título del reporte trimestral"},
                {"address": "B1", "value": "ignored because merged away"}
            ], [{"address": "B2", "value": "abc"}]],
            "mergeCells": ["Sheet1!A1:B1"]
        }));

        let report = ReportBuilder::new(&config).populate(&doc).unwrap();
        let sheet = report.workbook.worksheet(0).unwrap();
        assert_eq!(sheet.merged_regions(), &[CellRange::parse("A1:B1").unwrap()]);
        assert!(sheet.get_value("B1").unwrap().is_empty());
        assert_eq!(sheet.column_width(1), Some(5.0));
    }

    #[test]
    fn test_fatal_inputs() {
        let config = ReportConfig::default();
        let builder = ReportBuilder::new(&config);

        let bad_style = document(json!({
            "analysisData": [[{"address": "A1", "value": 1, "style": {"font": "bold"}}]]
        }));
        assert!(matches!(
            builder.populate(&bad_style),
            Err(ReportError::InvalidStyleSpec { address, .. }) if address == "A1"
        ));

        let bad_address = document(json!({"analysisData": [[{"address": "1A", "value": 1}]]}));
        assert!(matches!(
            builder.populate(&bad_address),
            Err(ReportError::InvalidStyleSpec { .. })
        ));

        let overlapping = document(json!({
            "analysisData": [], "mergeCells": ["A1:B2", "B2:C3"]
        }));
        assert!(matches!(
            builder.populate(&overlapping),
            Err(ReportError::MalformedDocument(_))
        ));

        let bad_merge = document(json!({"analysisData": [], "mergeCells": ["A1-B2"]}));
        assert!(matches!(
            builder.populate(&bad_merge),
            Err(ReportError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_best_effort_entries_become_warnings() {
        let config = ReportConfig::default();
        let doc = document(json!({
            "analysisData": [[{"address": "A1", "value": 5}]],
            "conditionalFormattingRules": [
                {"ref": "A1:A5", "type": "cellIs", "operator": "greaterThan", "formulae": ["abc"]},
                {"ref": "A1:A5", "type": "cellIs", "operator": "lessThan", "formulae": ["3"]}
            ],
            "charts": [{"type": "radar", "data_range": "A1:A5"}, {"type": "line", "data_range": "A1:A5"}]
        }));

        let report = ReportBuilder::new(&config).populate(&doc).unwrap();
        assert_eq!(report.workbook.worksheet(0).unwrap().conditional_formats().len(), 1);
        assert_eq!(report.charts.len(), 1);
        assert_eq!(
            report.warnings,
            vec![
                BuildWarning::new(
                    WarningSource::ConditionalRule,
                    0,
                    SkipReason::NoUsableFormulae
                ),
                BuildWarning::new(
                    WarningSource::Chart,
                    0,
                    SkipReason::UnsupportedChartType("radar".into())
                ),
            ]
        );
    }

    #[test]
    fn test_invalid_sheet_title_is_a_config_error() {
        let config = ReportConfig {
            sheet_title: "Q1/Q2".into(),
            ..ReportConfig::default()
        };
        assert!(matches!(
            ReportBuilder::new(&config).populate(&ReportDocument::default()),
            Err(ReportError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_longest_values_over_dense_grid() {
        let mut sheet = Worksheet::new("Hoja");
        sheet.set_cell_value("C2", 3.0).unwrap();
        sheet.set_cell_value("A1", "abcd").unwrap();

        let longest = longest_values(&sheet);
        assert_eq!(longest, BTreeMap::from([(0, 4), (1, 0), (2, 1)]));
    }
}
