//! XLSX writer

mod chart;

use std::fs::File;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{write_color, XlsxStyleTable};
use chart::DrawingPart;
use xlreport_chart::Charts;
use xlreport_core::conditional_format::{CfOperator, CfRuleType};
use xlreport_core::{CellAddress, CellValue, Workbook, Worksheet};

/// Name recorded as the creating application in docProps
const APPLICATION: &str = "xlreport";

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a workbook to a file path
    pub fn write_file<P: AsRef<Path>>(workbook: &Workbook, path: P) -> XlsxResult<()> {
        let file = File::create(path)?;
        Self::write(workbook, file)
    }

    /// Write a workbook to a writer
    pub fn write<W: Write + Seek>(workbook: &Workbook, writer: W) -> XlsxResult<()> {
        Self::write_with_charts(workbook, &Charts::new(), writer)
    }

    /// Serialize a workbook and its charts into an in-memory package
    pub fn to_bytes(workbook: &Workbook, charts: &Charts) -> XlsxResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        Self::write_with_charts(workbook, charts, &mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write a workbook with charts placed on its sheets
    ///
    /// Charts keyed by a sheet index the workbook does not have are dropped.
    pub fn write_with_charts<W: Write + Seek>(
        workbook: &Workbook,
        charts: &Charts,
        writer: W,
    ) -> XlsxResult<()> {
        let mut zip = zip::ZipWriter::new(writer);

        // Build a workbook-wide style table.
        let style_table = XlsxStyleTable::build(workbook);
        let drawings = Self::layout_drawings(workbook, charts);

        Self::write_content_types(&mut zip, workbook, &drawings)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_doc_props(&mut zip)?;
        Self::write_workbook_xml(&mut zip, workbook)?;
        Self::write_workbook_rels(&mut zip, workbook)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        for (i, sheet) in workbook.worksheets().enumerate() {
            let drawing = drawings.iter().find(|d| d.sheet_index == i);
            Self::write_worksheet(&mut zip, sheet, i, &style_table, drawing.is_some())?;

            if let Some(part) = drawing {
                Self::write_worksheet_rels(&mut zip, i, part.drawing_number)?;
                Self::write_drawing(&mut zip, part, charts)?;
            }
        }

        zip.finish()?;
        Ok(())
    }

    /// Number drawings and charts in sheet order
    fn layout_drawings(workbook: &Workbook, charts: &Charts) -> Vec<DrawingPart> {
        let mut parts = Vec::new();
        let mut next_chart = 1;
        for (sheet_index, sheet_charts) in charts.iter() {
            if sheet_index >= workbook.sheet_count() {
                log::warn!(
                    "dropping {} chart(s) for missing sheet index {sheet_index}",
                    sheet_charts.len()
                );
                continue;
            }
            parts.push(DrawingPart {
                sheet_index,
                drawing_number: parts.len() + 1,
                first_chart_number: next_chart,
                chart_count: sheet_charts.len(),
            });
            next_chart += sheet_charts.len();
        }
        parts
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
        drawings: &[DrawingPart],
    ) -> XlsxResult<()> {
        zip.start_file("[Content_Types].xml", SimpleFileOptions::default())?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
    <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
    <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        for part in drawings {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/drawings/drawing{}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawing+xml"/>"#,
                part.drawing_number
            ));
            for n in part.chart_numbers() {
                content.push_str(&format!(
                    r#"
    <Override PartName="/xl/charts/chart{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.drawingml.chart+xml"/>"#
                ));
            }
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        zip.start_file("_rels/.rels", SimpleFileOptions::default())?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_doc_props<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");

        zip.start_file("docProps/core.xml", SimpleFileOptions::default())?;
        let core = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
    <dc:creator>{APPLICATION}</dc:creator>
    <dcterms:created xsi:type="dcterms:W3CDTF">{now}</dcterms:created>
    <dcterms:modified xsi:type="dcterms:W3CDTF">{now}</dcterms:modified>
</cp:coreProperties>"#
        );
        zip.write_all(core.as_bytes())?;

        zip.start_file("docProps/app.xml", SimpleFileOptions::default())?;
        let app = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
    <Application>{APPLICATION}</Application>
</Properties>"#
        );
        zip.write_all(app.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        zip.start_file("xl/workbook.xml", SimpleFileOptions::default())?;

        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <bookViews><workbookView activeTab="{}"/></bookViews>
    <sheets>"#,
            workbook.active_sheet()
        );

        for (i, sheet) in workbook.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape_xml(sheet.name()),
                i + 1,
                i + 1
            ));
        }

        content.push_str(
            r#"
    </sheets>
</workbook>"#,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        workbook: &Workbook,
    ) -> XlsxResult<()> {
        zip.start_file("xl/_rels/workbook.xml.rels", SimpleFileOptions::default())?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..workbook.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        // Styles relationship follows the sheets
        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            workbook.sheet_count() + 1
        ));

        content.push_str("\n</Relationships>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        zip.start_file("xl/styles.xml", SimpleFileOptions::default())?;
        zip.write_all(style_table.to_styles_xml().as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Worksheet,
        index: usize,
        style_table: &XlsxStyleTable,
        has_drawing: bool,
    ) -> XlsxResult<()> {
        zip.start_file(
            format!("xl/worksheets/sheet{}.xml", index + 1),
            SimpleFileOptions::default(),
        )?;

        let dimension = sheet
            .dimension()
            .map_or_else(|| "A1".to_string(), |d| d.to_a1_string());
        let mut content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <dimension ref="{dimension}"/>"#
        );

        let widths = sheet.column_widths();
        if !widths.is_empty() {
            content.push_str("\n    <cols>");
            for (col, width) in widths {
                content.push_str(&format!(
                    "\n        <col min=\"{0}\" max=\"{0}\" width=\"{1}\" customWidth=\"1\"/>",
                    col + 1,
                    width
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");

        // Cell data (sparse, row-major)
        let mut current_row: Option<u32> = None;
        for (row, col, cell) in sheet.iter_cells() {
            if current_row != Some(row) {
                if current_row.is_some() {
                    content.push_str("\n        </row>");
                }
                content.push_str(&format!("\n        <row r=\"{}\">", row + 1));
                current_row = Some(row);
            }

            let cell_ref = CellAddress::new(row, col).to_a1_string();
            let xf_id = style_table.xf_id_for(index, cell.style_index);
            let style_attr = if xf_id != 0 {
                format!(" s=\"{xf_id}\"")
            } else {
                String::new()
            };

            match &cell.value {
                CellValue::Formula { text, cached_value } => {
                    let formula = text.strip_prefix('=').unwrap_or(text);
                    let (type_attr, cached) = cached_value
                        .as_deref()
                        .map_or(("", String::new()), Self::value_parts);
                    let cached = if cached.is_empty() {
                        String::new()
                    } else {
                        format!("<v>{cached}</v>")
                    };
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{}{}><f>{}</f>{}</c>",
                        cell_ref,
                        style_attr,
                        type_attr.replace("inlineStr", "str"),
                        escape_xml(formula),
                        cached
                    ));
                }
                CellValue::String(s) => {
                    let space = if s.as_str().trim() != s.as_str() {
                        " xml:space=\"preserve\""
                    } else {
                        ""
                    };
                    content.push_str(&format!(
                        "\n            <c r=\"{}\"{} t=\"inlineStr\"><is><t{}>{}</t></is></c>",
                        cell_ref,
                        style_attr,
                        space,
                        escape_cell_text(s.as_str())
                    ));
                }
                CellValue::Empty => {
                    // Preserve style-only cells
                    if xf_id != 0 {
                        content.push_str(&format!("\n            <c r=\"{cell_ref}\"{style_attr}/>"));
                    }
                }
                other => {
                    let (type_attr, v) = Self::value_parts(other);
                    content.push_str(&format!(
                        "\n            <c r=\"{cell_ref}\"{style_attr}{type_attr}><v>{v}</v></c>"
                    ));
                }
            }
        }

        if current_row.is_some() {
            content.push_str("\n        </row>");
        }

        content.push_str("\n    </sheetData>");

        let merged_regions = sheet.merged_regions();
        if !merged_regions.is_empty() {
            content.push_str(&format!(
                "\n    <mergeCells count=\"{}\">",
                merged_regions.len()
            ));
            for range in merged_regions {
                content.push_str(&format!("\n        <mergeCell ref=\"{range}\"/>"));
            }
            content.push_str("\n    </mergeCells>");
        }

        Self::write_conditional_formatting(&mut content, sheet, index, style_table);

        if has_drawing {
            content.push_str("\n    <drawing r:id=\"rId1\"/>");
        }

        content.push_str("\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// `t` attribute and `<v>` text of a plain value
    fn value_parts(value: &CellValue) -> (&'static str, String) {
        match value {
            CellValue::Number(n) if n.is_finite() => ("", n.to_string()),
            CellValue::Number(_) => (" t=\"e\"", "#NUM!".to_string()),
            CellValue::Boolean(b) => (" t=\"b\"", u8::from(*b).to_string()),
            CellValue::Error(e) => (" t=\"e\"", escape_xml(e.as_str())),
            CellValue::String(s) => (" t=\"inlineStr\"", escape_cell_text(s.as_str())),
            CellValue::Formula { cached_value, .. } => cached_value
                .as_deref()
                .map_or(("", String::new()), Self::value_parts),
            CellValue::Empty => ("", String::new()),
        }
    }

    fn write_conditional_formatting(
        content: &mut String,
        sheet: &Worksheet,
        sheet_index: usize,
        style_table: &XlsxStyleTable,
    ) {
        // One <conditionalFormatting> per rule
        for (rule_idx, rule) in sheet.conditional_formats().iter().enumerate() {
            let Some(first_range) = rule.ranges.first() else {
                continue;
            };

            let sqref: String = rule
                .ranges
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(" ");

            content.push_str(&format!(
                "\n    <conditionalFormatting sqref=\"{sqref}\">"
            ));

            let rule_type = escape_xml(rule.rule_type.xlsx_type());
            let dxf_attr = style_table
                .dxf_id_for(sheet_index, rule_idx)
                .map_or(String::new(), |id| format!(" dxfId=\"{id}\""));
            let priority = rule.priority.max(1);
            let stop_if_true = if rule.stop_if_true {
                " stopIfTrue=\"1\""
            } else {
                ""
            };

            match &rule.rule_type {
                CfRuleType::Threshold {
                    operator, formulas, ..
                } => {
                    let operator_attr = operator.map_or(String::new(), |op| {
                        format!(" operator=\"{}\"", op.xlsx_operator())
                    });
                    content.push_str(&format!(
                        "\n        <cfRule type=\"{rule_type}\"{operator_attr}{dxf_attr} priority=\"{priority}\"{stop_if_true}>"
                    ));
                    for formula in formulas {
                        content.push_str(&format!("\n            <formula>{formula}</formula>"));
                    }
                    content.push_str("\n        </cfRule>");
                }

                CfRuleType::ContainsText { operator, text } => {
                    let operator = operator.unwrap_or(CfOperator::ContainsText);
                    match text {
                        Some(text) => {
                            let anchor =
                                CellAddress::new(first_range.start.row, first_range.start.col);
                            let formula = text_rule_formula(operator, text, &anchor)
                                .map_or(String::new(), |f| {
                                    format!("\n            <formula>{}</formula>", escape_xml(&f))
                                });
                            content.push_str(&format!(
                                "\n        <cfRule type=\"{}\" operator=\"{}\"{} priority=\"{}\"{} text=\"{}\">{}\n        </cfRule>",
                                rule_type,
                                operator.xlsx_operator(),
                                dxf_attr,
                                priority,
                                stop_if_true,
                                escape_xml(text),
                                formula
                            ));
                        }
                        None => content.push_str(&format!(
                            "\n        <cfRule type=\"{rule_type}\" operator=\"{}\"{dxf_attr} priority=\"{priority}\"{stop_if_true}/>",
                            operator.xlsx_operator()
                        )),
                    }
                }

                CfRuleType::DataBar {
                    min_value,
                    max_value,
                    color,
                } => {
                    content.push_str(&format!(
                        "\n        <cfRule type=\"{rule_type}\" priority=\"{priority}\"{stop_if_true}>\n            <dataBar>"
                    ));
                    for threshold in [min_value, max_value] {
                        let val_attr = threshold
                            .value
                            .as_ref()
                            .map_or(String::new(), |v| format!(" val=\"{}\"", escape_xml(v)));
                        content.push_str(&format!(
                            "\n                <cfvo type=\"{}\"{}/>",
                            threshold.value_type.xlsx_type(),
                            val_attr
                        ));
                    }
                    content.push_str("\n                ");
                    content.push_str(&write_color("color", color));
                    content.push_str("\n            </dataBar>\n        </cfRule>");
                }
            }

            content.push_str("\n    </conditionalFormatting>");
        }
    }

    /// Worksheet relationships; the drawing is always `rId1`
    fn write_worksheet_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet_index: usize,
        drawing_number: usize,
    ) -> XlsxResult<()> {
        zip.start_file(
            format!("xl/worksheets/_rels/sheet{}.xml.rels", sheet_index + 1),
            SimpleFileOptions::default(),
        )?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing" Target="../drawings/drawing{drawing_number}.xml"/>
</Relationships>"#
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_drawing<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        part: &DrawingPart,
        charts: &Charts,
    ) -> XlsxResult<()> {
        let sheet_charts = charts.for_sheet(part.sheet_index);
        if sheet_charts.len() != part.chart_count {
            return Err(XlsxError::InvalidFormat(format!(
                "chart layout out of step for sheet {}",
                part.sheet_index + 1
            )));
        }

        zip.start_file(
            format!("xl/drawings/drawing{}.xml", part.drawing_number),
            SimpleFileOptions::default(),
        )?;
        zip.write_all(chart::drawing_xml(sheet_charts).as_bytes())?;

        zip.start_file(
            format!("xl/drawings/_rels/drawing{}.xml.rels", part.drawing_number),
            SimpleFileOptions::default(),
        )?;
        zip.write_all(chart::drawing_rels_xml(part).as_bytes())?;

        for (number, chart) in part.chart_numbers().zip(sheet_charts) {
            zip.start_file(
                format!("xl/charts/chart{number}.xml"),
                SimpleFileOptions::default(),
            )?;
            zip.write_all(chart::chart_xml(chart).as_bytes())?;
        }
        Ok(())
    }
}

/// The formula Excel evaluates for a text rule anchored at `anchor`
///
/// Operators that do not compare text get no formula.
fn text_rule_formula(operator: CfOperator, text: &str, anchor: &CellAddress) -> Option<String> {
    let needle = text.replace('"', "\"\"");
    match operator {
        CfOperator::ContainsText => Some(format!("NOT(ISERROR(SEARCH(\"{needle}\",{anchor})))")),
        CfOperator::NotContains => Some(format!("ISERROR(SEARCH(\"{needle}\",{anchor}))")),
        CfOperator::BeginsWith => Some(format!("LEFT({anchor},LEN(\"{needle}\"))=\"{needle}\"")),
        CfOperator::EndsWith => Some(format!("RIGHT({anchor},LEN(\"{needle}\"))=\"{needle}\"")),
        _ => None,
    }
}

/// Cell text as Excel stores it: a literal `_x` becomes `_x005F_x` and
/// characters XML 1.0 cannot carry become `_xHHHH_`
pub(crate) fn escape_cell_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '_' if chars.peek() == Some(&'x') => out.push_str("_x005F_"),
            '\t' | '\n' => out.push(c),
            c if u32::from(c) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                out.push_str(&format!("_x{:04X}_", u32::from(c)));
            }
            c => out.push(c),
        }
    }
    escape_xml(&out)
}

pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use xlreport_chart::{Chart, ChartType, DataReference, DataSeries};
    use xlreport_core::{CellRange, Color, ConditionalFormatRule, CfOperator, Style};

    fn part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut xml = String::new();
        file.read_to_string(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_worksheet_cols_and_merges() {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        sheet.set_cell_value("A1", "Título").unwrap();
        sheet.set_cell_value("B2", 3.5).unwrap();
        sheet.set_cell_value("C2", true).unwrap();
        sheet.set_column_width(0, 8.0);
        sheet.merge_cells(&CellRange::parse("A1:C1").unwrap()).unwrap();

        let bytes = XlsxWriter::to_bytes(&wb, &Charts::new()).unwrap();
        let xml = part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(xml.contains("<dimension ref=\"A1:C2\"/>"));
        assert!(xml.contains("<col min=\"1\" max=\"1\" width=\"8\" customWidth=\"1\"/>"));
        assert!(xml.contains("<c r=\"A1\" t=\"inlineStr\"><is><t>Título</t></is></c>"));
        assert!(xml.contains("<c r=\"B2\"><v>3.5</v></c>"));
        assert!(xml.contains("<c r=\"C2\" t=\"b\"><v>1</v></c>"));
        assert!(xml.contains("<mergeCell ref=\"A1:C1\"/>"));
        assert!(!xml.contains("<drawing"));

        let core = part(&bytes, "docProps/core.xml");
        assert!(core.contains("<dcterms:created xsi:type=\"dcterms:W3CDTF\">"));
    }

    #[test]
    fn test_conditional_formatting_rules() {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        let range = CellRange::parse("B2:B10").unwrap();
        sheet.add_conditional_format(
            ConditionalFormatRule::cell_is(CfOperator::Between, vec![10.0, 20.5])
                .with_range(range)
                .with_format(Style::new().bold(true)),
        );
        sheet.add_conditional_format(
            ConditionalFormatRule::contains_text("Urgent").with_range(range),
        );
        sheet.add_conditional_format(
            ConditionalFormatRule::data_bar(Color::rgb(0x63, 0x8E, 0xC6)).with_range(range),
        );

        let bytes = XlsxWriter::to_bytes(&wb, &Charts::new()).unwrap();
        let xml = part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(xml.contains(
            "<cfRule type=\"cellIs\" operator=\"between\" dxfId=\"0\" priority=\"1\">"
        ));
        assert!(xml.contains("<formula>10</formula>"));
        assert!(xml.contains("<formula>20.5</formula>"));
        assert!(xml.contains("text=\"Urgent\""));
        assert!(xml.contains("NOT(ISERROR(SEARCH(&quot;Urgent&quot;,B2)))"));
        assert!(xml.contains("<cfvo type=\"min\"/>"));
        assert!(xml.contains("<cfvo type=\"max\"/>"));
        assert!(xml.contains("<color rgb=\"FF638EC6\"/>"));
    }

    #[test]
    fn test_charts_get_drawing_parts() {
        let wb = Workbook::new();
        let mut charts = Charts::new();
        let mut chart = Chart::new(ChartType::Line);
        chart.add_series(DataSeries::new(DataReference::new(
            "Sheet1",
            CellRange::parse("A1:A5").unwrap(),
        )));
        charts.add(0, chart.clone());
        charts.add(0, chart.clone());
        charts.add(4, chart);

        let bytes = XlsxWriter::to_bytes(&wb, &charts).unwrap();
        let sheet = part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains("<drawing r:id=\"rId1\"/>"));
        let rels = part(&bytes, "xl/worksheets/_rels/sheet1.xml.rels");
        assert!(rels.contains("Target=\"../drawings/drawing1.xml\""));
        let types = part(&bytes, "[Content_Types].xml");
        assert!(types.contains("/xl/charts/chart2.xml"));
        assert!(!types.contains("/xl/charts/chart3.xml"));
        assert!(part(&bytes, "xl/charts/chart1.xml").contains("<c:f>Sheet1!$A$1:$A$5</c:f>"));
    }

    #[test]
    fn test_text_rule_formula_follows_operator() {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        for operator in [
            CfOperator::NotContains,
            CfOperator::BeginsWith,
            CfOperator::EndsWith,
            CfOperator::Equal,
        ] {
            sheet.add_conditional_format(
                ConditionalFormatRule::new(CfRuleType::ContainsText {
                    operator: Some(operator),
                    text: Some("Urgent".into()),
                })
                .with_range(CellRange::parse("$C$3:$C$9").unwrap()),
            );
        }

        let bytes = XlsxWriter::to_bytes(&wb, &Charts::new()).unwrap();
        let xml = part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(xml.contains("<formula>ISERROR(SEARCH(&quot;Urgent&quot;,C3))</formula>"));
        assert!(!xml.contains("NOT(ISERROR"));
        assert!(xml.contains(
            "<formula>LEFT(C3,LEN(&quot;Urgent&quot;))=&quot;Urgent&quot;</formula>"
        ));
        assert!(xml.contains(
            "<formula>RIGHT(C3,LEN(&quot;Urgent&quot;))=&quot;Urgent&quot;</formula>"
        ));
        assert!(xml.contains(
            "operator=\"equal\" priority=\"4\" text=\"Urgent\">\n        </cfRule>"
        ));
    }

    #[test]
    fn test_cell_text_escapes() {
        assert_eq!(escape_cell_text("code_x0041_ok"), "code_x005F_x0041_ok");
        assert_eq!(escape_cell_text("a\u{1}b\rc"), "a_x0001_b_x000D_c");
        assert_eq!(escape_cell_text("tab\tline\n"), "tab\tline\n");
        assert_eq!(escape_cell_text("snake_case <b>"), "snake_case &lt;b&gt;");
    }
}
