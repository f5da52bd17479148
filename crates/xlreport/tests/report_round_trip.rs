//! End-to-end tests: JSON document -> XLSX bytes -> workbook -> JSON document

use std::io::{Cursor, Read};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use xlreport::model::conditional_format::{CfOperator, CfRuleType, CfValueType};
use xlreport::model::Workbook;
use xlreport::{
    ExtractedSheet, ReportConfig, ReportService, SkipReason, StyleCodec, WarningSource,
};
use xlreport_xlsx::XlsxReader;

const LONG_TEXT: &str = "Descripción extensa del producto que supera el ancho máximo";

fn report_document() -> Value {
    json!({
        "analysisData": [
            [
                {"address": "A1", "value": "Reporte de ventas",
                 "style": {"font": {"name": "Arial", "size": 14, "bold": true, "color": "1F4E78"},
                           "alignment": {"horizontal": "center"}}},
                {"address": "B1", "value": null},
                {"address": "C1", "value": null},
                {"address": "D1", "value": null}
            ],
            [
                {"address": "A2", "value": "Producto",
                 "style": {"fill": {"pattern": "solid", "start_color": "DDEBF7"},
                           "border": {"bottom": {"style": "thin", "color": "000000"}, "top": {"style": "double"}}}},
                {"address": "B2", "value": "Detalle"},
                {"address": "C2", "value": "Q1"},
                {"address": "D2", "value": "Q2"}
            ],
            [
                {"address": "A3", "value": "Uva"},
                {"address": "B3", "value": "x"},
                {"address": "C3", "value": 10, "style": {"numFmt": "#,##0.00"}},
                {"address": "D3", "value": 12.75}
            ],
            [
                {"address": "A4", "value": LONG_TEXT,
                 "style": {"alignment": {"wrap_text": true, "vertical": "top"}, "font": {"italic": false}}},
                {"address": "B4", "value": "y"},
                {"address": "C4", "value": -3},
                {"address": "D4", "value": true}
            ],
            [
                {"address": "E5", "value": "abc"}
            ]
        ],
        "mergeCells": ["Sheet1!B2:D2", "A1:D1"],
        "conditionalFormattingRules": [
            {"ref": "C3:C4", "type": "cellIs", "operator": "between", "formulae": ["10", "abc", "20"],
             "style": {"fill": {"pattern": "solid", "start_color": "C6EFCE"}}},
            {"ref": "C3:C4", "type": "cellIs", "operator": "greaterThan", "formulae": ["abc", null, " "]},
            {"ref": "D3:D4", "type": "dataBar", "operator": "equal", "formulae": ["1"], "color": "FF638EC6"},
            {"ref": "A3:A4", "type": "containsText", "operator": "containsText",
             "formulae": ["Urgent", "Ignored"], "style": {"font": {"color": "9C0006"}}}
        ],
        "charts": [
            {"type": "col", "title": "Trimestres", "data_range": "Sheet1!C2:D4", "category_range": "A3:A4"},
            {"type": "radar", "data_range": "C2:D4"}
        ]
    })
}

fn service() -> ReportService {
    ReportService::new(ReportConfig::default())
}

fn build_and_parse(document: &Value) -> (Vec<u8>, ExtractedSheet) {
    let service = service();
    let report = service.build_json(&document.to_string()).unwrap();
    let mut extracted = service.parse(&report.bytes).unwrap();
    assert_eq!(extracted.sheets.len(), 1);
    (report.bytes, extracted.sheets.remove(0))
}

fn zip_part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    Some(content)
}

fn input_cells(document: &Value) -> Vec<&Value> {
    document["analysisData"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|row| row.as_array().unwrap())
        .collect()
}

fn same_scalar(extracted: &Value, written: &Value) -> bool {
    match (extracted, written) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}

fn normalize_color(text: &str) -> String {
    let hex = text.trim_start_matches('#').to_ascii_uppercase();
    if hex.len() == 6 {
        format!("FF{hex}")
    } else {
        hex
    }
}

/// Every key of `extracted` is present in `written` with the same value;
/// colors compare as ARGB and a `null` border color matches an absent one
fn is_style_subset(extracted: &Value, written: &Value, key: &str) -> bool {
    match (extracted, written) {
        (Value::Object(e), Value::Object(w)) => e.iter().all(|(k, v)| match w.get(k) {
            Some(wv) => is_style_subset(v, wv, k),
            None => v.is_null(),
        }),
        (Value::String(e), Value::String(w)) if key.contains("color") => {
            normalize_color(e) == normalize_color(w)
        }
        (e, w) => same_scalar(e, w),
    }
}

#[test]
fn test_values_round_trip() {
    let document = report_document();
    let (_, sheet) = build_and_parse(&document);
    let merged: Vec<_> = sheet
        .merged_cells
        .iter()
        .map(|r| xlreport::model::CellRange::parse(r).unwrap())
        .collect();

    for cell in input_cells(&document) {
        let address = cell["address"].as_str().unwrap();
        let addr = xlreport::model::CellAddress::parse(address).unwrap();
        let extracted = sheet.cell(address).unwrap();

        let member = merged
            .iter()
            .any(|r| r.contains(addr.row, addr.col) && !r.is_anchor(addr.row, addr.col));
        if member {
            assert!(extracted.is_merged_part, "{address} should be a merge member");
            assert_eq!(extracted.value, Value::Null);
        } else {
            assert!(
                same_scalar(&extracted.value, &cell["value"]),
                "{address}: {} != {}",
                extracted.value,
                cell["value"]
            );
        }
    }
    assert_eq!(sheet.cell("C3").unwrap().value, json!(10));
    assert_eq!(sheet.cell("D4").unwrap().value, json!(true));
}

#[test]
fn test_styles_read_back_as_subset() {
    let document = report_document();
    let (_, sheet) = build_and_parse(&document);

    for cell in input_cells(&document) {
        let address = cell["address"].as_str().unwrap();
        let extracted = sheet.cell(address).unwrap();
        let Some(style) = &extracted.style else {
            continue;
        };
        let extracted_json = serde_json::to_value(style).unwrap();
        let written = match cell.get("style") {
            Some(raw) => serde_json::to_value(StyleCodec::decode(raw).unwrap()).unwrap(),
            None => json!({}),
        };
        assert!(
            is_style_subset(&extracted_json, &written, ""),
            "{address}: {extracted_json} is not a subset of {written}"
        );
    }

    let title = serde_json::to_value(sheet.cell("A1").unwrap().style.as_ref().unwrap()).unwrap();
    assert_eq!(
        title,
        json!({
            "font": {"name": "Arial", "size": 14.0, "bold": true, "color": "FF1F4E78"},
            "alignment": {"horizontal": "center"}
        })
    );
    let header = serde_json::to_value(sheet.cell("A2").unwrap().style.as_ref().unwrap()).unwrap();
    assert_eq!(header["fill"], json!({"pattern": "solid", "start_color": "FFDDEBF7"}));
    assert_eq!(
        header["border"],
        json!({
            "top": {"style": "double", "color": null},
            "bottom": {"style": "thin", "color": "FF000000"}
        })
    );
    assert_eq!(
        serde_json::to_value(sheet.cell("C3").unwrap().style.as_ref().unwrap()).unwrap(),
        json!({"numFmt": "#,##0.00"})
    );
    assert_eq!(
        serde_json::to_value(sheet.cell("B3").unwrap().style.as_ref().unwrap()).unwrap(),
        json!({})
    );
}

#[test]
fn test_merge_members_never_carry_style() {
    let (_, sheet) = build_and_parse(&report_document());

    assert_eq!(sheet.merged_cells, vec!["B2:D2".to_string(), "A1:D1".to_string()]);
    for address in ["B1", "C1", "D1", "C2", "D2"] {
        let cell = sheet.cell(address).unwrap();
        assert!(cell.is_merged_part, "{address}");
        assert_eq!(cell.style, None, "{address}");
    }
    let rendered = serde_json::to_value(sheet.cell("C2").unwrap()).unwrap();
    assert_eq!(rendered, json!({"address": "C2", "value": null, "is_merged_part": true}));
    assert!(!sheet.cell("B2").unwrap().is_merged_part);
}

#[test]
fn test_conditional_rules_in_written_file() {
    let (bytes, _) = build_and_parse(&report_document());
    let workbook: Workbook = XlsxReader::read_bytes(&bytes).unwrap();
    let rules = workbook.worksheet(0).unwrap().conditional_formats();

    assert_eq!(rules.len(), 3);
    assert_eq!(
        rules[0].rule_type,
        CfRuleType::Threshold {
            kind: "cellIs".into(),
            operator: Some(CfOperator::Between),
            formulas: vec![10.0, 20.0],
        }
    );
    assert!(rules[0].format.is_some());

    match &rules[1].rule_type {
        CfRuleType::DataBar {
            min_value,
            max_value,
            ..
        } => {
            assert_eq!(min_value.value_type, CfValueType::Min);
            assert_eq!(max_value.value_type, CfValueType::Max);
        }
        other => panic!("expected a data bar, got {other:?}"),
    }

    assert_eq!(
        rules[2].rule_type,
        CfRuleType::ContainsText {
            operator: Some(CfOperator::ContainsText),
            text: Some("Urgent".into()),
        }
    );
    assert!(rules.windows(2).all(|w| w[0].priority < w[1].priority));
}

#[test]
fn test_skipped_entries_are_reported_not_fatal() {
    let report = service().build_json(&report_document().to_string()).unwrap();
    let kinds: Vec<_> = report
        .warnings
        .iter()
        .map(|w| (w.kind, w.index, w.reason.clone()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (WarningSource::ConditionalRule, 1, SkipReason::NoUsableFormulae),
            (
                WarningSource::Chart,
                1,
                SkipReason::UnsupportedChartType("radar".into())
            ),
        ]
    );

    assert!(zip_part(&report.bytes, "xl/charts/chart1.xml").is_some());
    assert!(zip_part(&report.bytes, "xl/charts/chart2.xml").is_none());
}

#[test]
fn test_qualified_chart_range_matches_local_range() {
    let chart_doc = |range: &str| {
        json!({
            "analysisData": [[{"address": "A1", "value": "Serie"}], [{"address": "A2", "value": 4}]],
            "charts": [{"type": "line", "title": "T", "data_range": range}]
        })
    };
    let (qualified, _) = build_and_parse(&chart_doc("Sheet1!A1:A5"));
    let (local, _) = build_and_parse(&chart_doc("A1:A5"));

    let qualified = zip_part(&qualified, "xl/charts/chart1.xml").unwrap();
    assert_eq!(qualified, zip_part(&local, "xl/charts/chart1.xml").unwrap());
    assert!(qualified.contains("'Reporte Generado'!$A$2:$A$5"));
}

#[test]
fn test_column_widths_in_written_file() {
    let (bytes, _) = build_and_parse(&report_document());
    let workbook = XlsxReader::read_bytes(&bytes).unwrap();
    let sheet = workbook.worksheet(0).unwrap();

    assert!(LONG_TEXT.chars().count() > 48);
    assert_eq!(sheet.column_width(0), Some(50.0));
    // "abc" is the longest value in column E
    assert_eq!(sheet.column_width(4), Some(5.0));
    // "Detalle" (7); the merge members of row 2 do not count
    assert_eq!(sheet.column_width(1), Some(9.0));
}

#[test]
fn test_corrupt_input_fails_whole_parse() {
    assert!(matches!(
        service().parse(b"PK\x03\x04 truncated"),
        Err(xlreport::ReportError::Engine(_))
    ));
}

#[test]
fn test_build_to_disk_and_parse_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reporte_generado.xlsx");
    let report = service().build_json(&report_document().to_string()).unwrap();
    std::fs::write(&path, &report.bytes).unwrap();

    let workbook = XlsxReader::read_file(&path).unwrap();
    assert_eq!(workbook.worksheet(0).unwrap().name(), "Reporte Generado");
}

#[test]
fn test_text_with_excel_escapes_round_trips() {
    let document = json!({
        "analysisData": [[
            {"address": "A1", "value": "code_x0041_ok"},
            {"address": "B1", "value": "ctrl\u{1}char"},
            {"address": "C1", "value": "_x005F_"}
        ]]
    });
    let (_, sheet) = build_and_parse(&document);

    assert_eq!(sheet.cell("A1").unwrap().value, json!("code_x0041_ok"));
    assert_eq!(sheet.cell("B1").unwrap().value, json!("ctrl\u{1}char"));
    assert_eq!(sheet.cell("C1").unwrap().value, json!("_x005F_"));
}

#[test]
fn test_absolute_references_come_back_relative() {
    let document = json!({
        "analysisData": [[
            {"address": "A1", "value": "Resumen", "style": {"fill": {"pattern": "solid", "start_color": "FFFF00"}}},
            {"address": "A1", "style": {"font": {"bold": true}}, "value": "Resumen"}
        ]],
        "mergeCells": ["$A$1:$B$1"],
        "conditionalFormattingRules": [
            {"ref": "$A$2:$A$9", "type": "containsText", "operator": "notContains", "formulae": ["Urgent"]}
        ]
    });
    let (bytes, sheet) = build_and_parse(&document);

    assert_eq!(sheet.merged_cells, vec!["A1:B1".to_string()]);
    let style = serde_json::to_value(sheet.cell("A1").unwrap().style.as_ref().unwrap()).unwrap();
    assert_eq!(
        style,
        json!({
            "font": {"bold": true},
            "fill": {"pattern": "solid", "start_color": "FFFFFF00"}
        })
    );

    let xml = zip_part(&bytes, "xl/worksheets/sheet1.xml").unwrap();
    assert!(xml.contains("sqref=\"A2:A9\""));
    assert!(xml.contains("<formula>ISERROR(SEARCH(&quot;Urgent&quot;,A2))</formula>"));
}
