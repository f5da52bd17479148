//! Report extraction
//!
//! Every sheet becomes a dense grid from `A1` to its used bounds. Values are
//! read as computed (cached formula results). Merge members report only
//! their (empty) value and `is_merged_part`.

use serde_json::Value;

use crate::document::{cell_value_to_json, CellInfo, ExtractedDocument, ExtractedSheet};
use crate::style_codec::StyleCodec;
use xlreport_core::{CellAddress, Workbook, Worksheet};

/// Reads a workbook back into an [`ExtractedDocument`]
pub struct ReportExtractor;

impl ReportExtractor {
    /// Extract every sheet, in workbook order
    pub fn extract(workbook: &Workbook) -> ExtractedDocument {
        ExtractedDocument {
            sheets: workbook.worksheets().map(Self::extract_sheet).collect(),
        }
    }

    pub fn extract_sheet(sheet: &Worksheet) -> ExtractedSheet {
        let merged_cells = sheet
            .merged_regions()
            .iter()
            .map(|range| range.to_a1_string())
            .collect();

        let data: Vec<Vec<CellInfo>> = match sheet.dimension() {
            None => Vec::new(),
            Some(grid) => (grid.start.row..=grid.end.row)
                .map(|row| {
                    (grid.start.col..=grid.end.col)
                        .map(|col| Self::cell_info(sheet, row, col))
                        .collect()
                })
                .collect(),
        };
        log::debug!(
            "extracted sheet '{}': {} rows, {} merges",
            sheet.name(),
            data.len(),
            sheet.merged_regions().len()
        );

        ExtractedSheet {
            name: sheet.name().to_string(),
            data,
            merged_cells,
        }
    }

    fn cell_info(sheet: &Worksheet, row: u32, col: u16) -> CellInfo {
        let address = CellAddress::new(row, col).to_a1_string();
        let value = sheet
            .cell_at(row, col)
            .map_or(Value::Null, |cell| cell_value_to_json(&cell.value));

        if sheet.is_merge_member(row, col) {
            return CellInfo {
                address,
                value,
                style: None,
                is_merged_part: true,
            };
        }
        CellInfo {
            address,
            value,
            style: Some(StyleCodec::extract_style(sheet.cell_style_at(row, col))),
            is_merged_part: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{FontSpec, StyleSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xlreport_core::{CellRange, CellValue, Style};

    #[test]
    fn test_empty_sheet_has_no_rows() {
        let doc = ReportExtractor::extract(&Workbook::new());
        assert_eq!(doc.sheets.len(), 1);
        assert_eq!(doc.sheets[0].name, "Sheet1");
        assert!(doc.sheets[0].data.is_empty());
        assert!(doc.sheets[0].merged_cells.is_empty());
    }

    #[test]
    fn test_dense_grid_with_merge_members() {
        let mut sheet = Worksheet::new("Datos");
        sheet.set_cell_value("A1", "Encabezado").unwrap();
        sheet.set_cell_style("A1", &Style::new().italic(true)).unwrap();
        sheet.set_cell_value("B2", 7.0).unwrap();
        sheet.merge_cells(&CellRange::parse("A1:C1").unwrap()).unwrap();

        let extracted = ReportExtractor::extract_sheet(&sheet);
        assert_eq!(extracted.merged_cells, vec!["A1:C1".to_string()]);
        assert_eq!(extracted.data.len(), 2);
        assert_eq!(extracted.data[0].len(), 3);

        let anchor = extracted.cell("A1").unwrap();
        assert_eq!(anchor.value, json!("Encabezado"));
        assert_eq!(
            anchor.style,
            Some(StyleSpec {
                font: Some(FontSpec {
                    italic: Some(true),
                    ..FontSpec::default()
                }),
                ..StyleSpec::default()
            })
        );

        let member = extracted.cell("B1").unwrap();
        assert!(member.is_merged_part);
        assert_eq!(member.style, None);
        assert_eq!(member.value, Value::Null);

        let gap = extracted.cell("A2").unwrap();
        assert_eq!(gap.value, Value::Null);
        assert_eq!(gap.style, Some(StyleSpec::default()));
        assert_eq!(extracted.cell("B2").unwrap().value, json!(7));
    }

    #[test]
    fn test_formula_cells_report_cached_value() {
        let mut sheet = Worksheet::new("Calc");
        sheet
            .set_cell_value(
                "A1",
                CellValue::Formula {
                    text: "=2*21".into(),
                    cached_value: Some(Box::new(CellValue::Number(42.0))),
                },
            )
            .unwrap();
        let extracted = ReportExtractor::extract_sheet(&sheet);
        assert_eq!(extracted.data[0][0].value, json!(42));
    }
}
