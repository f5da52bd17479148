//! XLSX reader
//!
//! Loads cell values (formula cells keep their cached result), cell styles,
//! merged ranges, column widths and conditional formatting rules. Drawings
//! and charts are not read.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{XlsxError, XlsxResult};
use crate::styles::{attr_value, parse_color_attrs, read_styles_xml, ParsedStyles};
use xlreport_core::conditional_format::{
    CfOperator, CfRuleType, CfValue, CfValueType, ConditionalFormatRule,
};
use xlreport_core::style::{Color, Style};
use xlreport_core::{CellAddress, CellError, CellRange, CellValue, Workbook, Worksheet, MAX_COLS};

/// Decode Excel's `_xHHHH_` escape sequences (`_x000d_` is CR, `_x005f_` an
/// underscore, and so on)
fn decode_excel_escapes(s: &str) -> Cow<'_, str> {
    if !s.contains("_x") {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(pos) = rest.find("_x") {
        out.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let decoded = candidate
            .get(2..6)
            .filter(|hex| hex.bytes().all(|b| b.is_ascii_hexdigit()))
            .filter(|_| candidate.as_bytes().get(6) == Some(&b'_'))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32);
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &candidate[7..];
            }
            None => {
                out.push('_');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// A package relationship
#[derive(Debug, Clone)]
struct Relationship {
    kind: String,
    target: String,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a workbook from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<Workbook> {
        let file = File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a workbook from an in-memory package
    pub fn read_bytes(bytes: &[u8]) -> XlsxResult<Workbook> {
        Self::read(Cursor::new(bytes))
    }

    /// Read a workbook from a reader
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<Workbook> {
        let mut archive = zip::ZipArchive::new(reader)?;

        if archive.by_name("[Content_Types].xml").is_err() {
            return Err(XlsxError::InvalidFormat(
                "Missing [Content_Types].xml".into(),
            ));
        }

        let shared_strings = Self::read_shared_strings(&mut archive)?;
        let styles = Self::read_styles(&mut archive)?;
        let (sheets, active_tab) = Self::read_workbook_xml(&mut archive)?;
        let rels = Self::read_relationships(&mut archive, "xl/_rels/workbook.xml.rels")?
            .ok_or_else(|| XlsxError::MissingPart("xl/_rels/workbook.xml.rels".into()))?;

        let mut workbook = Workbook::empty();

        for (name, r_id) in &sheets {
            let Some(rel) = rels.get(r_id).filter(|r| r.kind.ends_with("/worksheet")) else {
                log::warn!("sheet '{name}' has no worksheet part ({r_id}), skipping");
                continue;
            };
            let path = match rel.target.strip_prefix('/') {
                Some(absolute) => absolute.to_string(),
                None => format!("xl/{}", rel.target),
            };

            let sheet_idx = workbook.add_worksheet_with_name(name)?;
            let sheet = workbook
                .worksheet_mut(sheet_idx)
                .ok_or_else(|| XlsxError::InvalidFormat(format!("sheet '{name}' vanished")))?;
            Self::read_worksheet(&mut archive, &path, sheet, &shared_strings, &styles)?;
            log::debug!("read sheet '{name}' with {} cells", sheet.cell_count());
        }

        if workbook.is_empty() {
            return Ok(Workbook::new());
        }
        if active_tab < workbook.sheet_count() {
            workbook.set_active_sheet(active_tab)?;
        }

        Ok(workbook)
    }

    /// Read the shared strings table; rich-text runs are concatenated and
    /// phonetic runs ignored
    fn read_shared_strings<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<Vec<String>> {
        let mut strings = Vec::new();

        let file = match archive.by_name("xl/sharedStrings.xml") {
            Ok(f) => f,
            Err(_) => return Ok(strings), // No shared strings is valid
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));

        let mut buf = Vec::new();
        let mut current = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Event::Empty(e) if e.name().as_ref() == b"si" => strings.push(String::new()),
                Event::End(e) => match e.name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current).into_owned());
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Text(e) if in_t => current.push_str(&e.unescape()?),
                Event::CData(e) if in_t => current.push_str(&String::from_utf8_lossy(&e)),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(strings)
    }

    fn read_styles<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> XlsxResult<ParsedStyles> {
        match archive.by_name("xl/styles.xml") {
            Ok(file) => read_styles_xml(file),
            Err(_) => Ok(ParsedStyles {
                cell_styles: vec![Style::default()],
                dxf_styles: Vec::new(),
            }),
        }
    }

    /// Sheet names with their relationship ids, in workbook order, plus the
    /// active tab
    fn read_workbook_xml<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
    ) -> XlsxResult<(Vec<(String, String)>, usize)> {
        let file = archive
            .by_name("xl/workbook.xml")
            .map_err(|_| XlsxError::MissingPart("xl/workbook.xml".into()))?;

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut sheets = Vec::new();
        let mut active_tab = 0;

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) => match e.name().as_ref() {
                    b"sheet" => {
                        if let (Some(name), Some(r_id)) =
                            (attr_value(&e, b"name"), attr_value(&e, b"r:id"))
                        {
                            sheets.push((name, r_id));
                        }
                    }
                    b"workbookView" => {
                        active_tab = attr_value(&e, b"activeTab")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok((sheets, active_tab))
    }

    /// Relationships of a part keyed by id, `None` when the part is absent
    fn read_relationships<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
    ) -> XlsxResult<Option<HashMap<String, Relationship>>> {
        let Ok(file) = archive.by_name(path) else {
            return Ok(None);
        };

        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        xml_reader.trim_text(true);

        let mut buf = Vec::new();
        let mut rels = HashMap::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"Relationship" => {
                    if let (Some(id), Some(kind), Some(target)) = (
                        attr_value(&e, b"Id"),
                        attr_value(&e, b"Type"),
                        attr_value(&e, b"Target"),
                    ) {
                        rels.insert(id, Relationship { kind, target });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Some(rels))
    }

    fn read_worksheet<R: Read + Seek>(
        archive: &mut zip::ZipArchive<R>,
        path: &str,
        worksheet: &mut Worksheet,
        shared_strings: &[String],
        styles: &ParsedStyles,
    ) -> XlsxResult<()> {
        let file = archive
            .by_name(path)
            .map_err(|_| XlsxError::MissingPart(path.to_string()))?;

        // Whitespace is kept so `xml:space="preserve"` text survives.
        let mut xml_reader = Reader::from_reader(BufReader::new(file));
        let mut buf = Vec::new();
        let mut parser = SheetParser {
            sheet: worksheet,
            shared_strings,
            styles,
            cell: None,
            text: TextTarget::None,
            cf_ranges: Vec::new(),
            rule: None,
            row: 0,
            next_row: 0,
            next_col: 0,
        };

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(e) => parser.open(&e)?,
                Event::Empty(e) => {
                    parser.open(&e)?;
                    parser.close(e.name().as_ref())?;
                }
                Event::End(e) => parser.close(e.name().as_ref())?,
                Event::Text(e) => {
                    if parser.text != TextTarget::None {
                        let text = e.unescape()?;
                        parser.push_text(&text);
                    }
                }
                Event::CData(e) => parser.push_text(&String::from_utf8_lossy(&e)),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(())
    }
}

/// Where character data inside a worksheet currently goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Formula,
    InlineString,
    RuleFormula,
}

#[derive(Debug)]
struct PendingCell {
    address: CellAddress,
    cell_type: Option<String>,
    style: u32,
    value: Option<String>,
    formula: Option<String>,
    inline: Option<String>,
}

#[derive(Debug)]
struct PendingRule {
    kind: String,
    operator: Option<String>,
    priority: u32,
    stop_if_true: bool,
    dxf_id: Option<usize>,
    text: Option<String>,
    formulas: Vec<String>,
    thresholds: Vec<CfValue>,
    color: Option<Color>,
}

struct SheetParser<'a> {
    sheet: &'a mut Worksheet,
    shared_strings: &'a [String],
    styles: &'a ParsedStyles,
    cell: Option<PendingCell>,
    text: TextTarget,
    cf_ranges: Vec<CellRange>,
    rule: Option<PendingRule>,
    /// Position used when `<row>` or `<c>` leave out their `r` attribute
    row: u32,
    next_row: u32,
    next_col: u16,
}

impl SheetParser<'_> {
    fn open(&mut self, e: &BytesStart<'_>) -> XlsxResult<()> {
        match e.name().as_ref() {
            b"row" => {
                self.row = match attr_value(e, b"r") {
                    Some(r) => r
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|r| *r > 0)
                        .map(|r| r - 1)
                        .ok_or_else(|| XlsxError::Parse(format!("Invalid row number '{r}'")))?,
                    None => self.next_row,
                };
                self.next_row = self.row + 1;
                self.next_col = 0;
            }
            b"c" => {
                let address = match attr_value(e, b"r") {
                    Some(reference) => CellAddress::parse(&reference).map_err(|err| {
                        XlsxError::Parse(format!("Invalid cell reference '{reference}': {err}"))
                    })?,
                    None => CellAddress::new(self.row, self.next_col),
                };
                self.next_col = address.col.saturating_add(1);
                self.cell = Some(PendingCell {
                    address,
                    cell_type: attr_value(e, b"t"),
                    style: attr_value(e, b"s")
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(0),
                    value: None,
                    formula: None,
                    inline: None,
                });
            }
            b"v" if self.cell.is_some() => self.text = TextTarget::Value,
            b"f" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.formula.get_or_insert_with(String::new);
                    self.text = TextTarget::Formula;
                }
            }
            b"t" => {
                if let Some(cell) = self.cell.as_mut() {
                    cell.inline.get_or_insert_with(String::new);
                    self.text = TextTarget::InlineString;
                }
            }
            b"col" => self.read_column(e),
            b"mergeCell" => {
                if let Some(reference) = attr_value(e, b"ref") {
                    let range = CellRange::parse(&reference).map_err(|err| {
                        XlsxError::Parse(format!("invalid merge range '{reference}': {err}"))
                    })?;
                    if let Err(err) = self.sheet.merge_cells(&range) {
                        log::warn!("ignoring merge {reference}: {err}");
                    }
                }
            }
            b"conditionalFormatting" => {
                self.cf_ranges = attr_value(e, b"sqref")
                    .unwrap_or_default()
                    .split_whitespace()
                    .filter_map(|r| CellRange::parse(r).ok())
                    .collect();
            }
            b"cfRule" => {
                self.rule = Some(PendingRule {
                    kind: attr_value(e, b"type").unwrap_or_default(),
                    operator: attr_value(e, b"operator"),
                    priority: attr_value(e, b"priority")
                        .and_then(|p| p.parse().ok())
                        .unwrap_or(0),
                    stop_if_true: matches!(
                        attr_value(e, b"stopIfTrue").as_deref(),
                        Some("1" | "true")
                    ),
                    dxf_id: attr_value(e, b"dxfId").and_then(|d| d.parse().ok()),
                    text: attr_value(e, b"text"),
                    formulas: Vec::new(),
                    thresholds: Vec::new(),
                    color: None,
                });
            }
            b"formula" => {
                if let Some(rule) = self.rule.as_mut() {
                    rule.formulas.push(String::new());
                    self.text = TextTarget::RuleFormula;
                }
            }
            b"cfvo" => {
                if let Some(rule) = self.rule.as_mut() {
                    let value_type = attr_value(e, b"type")
                        .as_deref()
                        .and_then(CfValueType::from_xlsx)
                        .unwrap_or_default();
                    rule.thresholds
                        .push(CfValue::new(value_type, attr_value(e, b"val")));
                }
            }
            b"color" => {
                if let Some(rule) = self.rule.as_mut() {
                    rule.color = Some(parse_color_attrs(e));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> XlsxResult<()> {
        match name {
            b"c" => {
                if let Some(cell) = self.cell.take() {
                    self.finish_cell(cell)?;
                }
                self.text = TextTarget::None;
            }
            b"v" | b"f" | b"t" | b"formula" => self.text = TextTarget::None,
            b"cfRule" => {
                if let Some(rule) = self.rule.take() {
                    self.finish_rule(rule);
                }
            }
            b"conditionalFormatting" => self.cf_ranges.clear(),
            _ => {}
        }
        Ok(())
    }

    fn push_text(&mut self, text: &str) {
        let slot = match (self.text, self.cell.as_mut(), self.rule.as_mut()) {
            (TextTarget::Value, Some(cell), _) => cell.value.get_or_insert_with(String::new),
            (TextTarget::Formula, Some(cell), _) => cell.formula.get_or_insert_with(String::new),
            (TextTarget::InlineString, Some(cell), _) => {
                cell.inline.get_or_insert_with(String::new)
            }
            (TextTarget::RuleFormula, _, Some(rule)) => match rule.formulas.last_mut() {
                Some(formula) => formula,
                None => return,
            },
            _ => return,
        };
        slot.push_str(text);
    }

    /// `<col min max width>` applies the width to every column in the span
    fn read_column(&mut self, e: &BytesStart<'_>) {
        let number = |key: &[u8]| attr_value(e, key).and_then(|v| v.parse::<u16>().ok());
        let (Some(min), Some(max)) = (number(b"min"), number(b"max")) else {
            return;
        };
        let Some(width) = attr_value(e, b"width").and_then(|v| v.parse::<f64>().ok()) else {
            return;
        };
        for col in min.max(1)..=max.min(MAX_COLS) {
            self.sheet.set_column_width(col - 1, width);
        }
    }

    fn finish_cell(&mut self, cell: PendingCell) -> XlsxResult<()> {
        let addr = cell.address;
        let value = self.plain_value(&cell)?;
        match cell.formula.as_deref().filter(|f| !f.is_empty()) {
            Some(formula) => {
                self.sheet.set_cell_value_at(
                    addr.row,
                    addr.col,
                    CellValue::Formula {
                        text: format!("={formula}"),
                        cached_value: value.map(Box::new),
                    },
                )?;
            }
            None => {
                if let Some(value) = value {
                    self.sheet.set_cell_value_at(addr.row, addr.col, value)?;
                }
            }
        }

        if cell.style != 0 {
            let style = self
                .styles
                .cell_styles
                .get(cell.style as usize)
                .ok_or_else(|| XlsxError::Parse(format!("Style index {} out of bounds", cell.style)))?;
            self.sheet.set_cell_style_at(addr.row, addr.col, style)?;
        }

        Ok(())
    }

    /// The stored value of a cell, or the cached result of a formula cell
    fn plain_value(&self, cell: &PendingCell) -> XlsxResult<Option<CellValue>> {
        if cell.cell_type.as_deref() == Some("inlineStr") {
            return Ok(cell
                .inline
                .as_deref()
                .map(|s| CellValue::string(decode_excel_escapes(s))));
        }
        let Some(raw) = cell.value.as_deref() else {
            return Ok(None);
        };

        let value = match cell.cell_type.as_deref() {
            Some("s") => {
                let idx: usize = raw.trim().parse().map_err(|_| {
                    XlsxError::Parse(format!("Invalid shared string index: {raw}"))
                })?;
                let s = self.shared_strings.get(idx).ok_or_else(|| {
                    XlsxError::Parse(format!("Shared string index {idx} out of bounds"))
                })?;
                CellValue::string(s.as_str())
            }
            Some("b") => CellValue::Boolean(matches!(raw.trim(), "1" | "true" | "TRUE")),
            Some("e") => CellError::parse(raw.trim())
                .map(CellValue::Error)
                .unwrap_or_else(|| CellValue::string(raw)),
            Some("str") => CellValue::string(decode_excel_escapes(raw)),
            None | Some("n") => match raw.trim().parse::<f64>() {
                Ok(n) => CellValue::Number(n),
                Err(_) => CellValue::string(raw),
            },
            // ISO dates and unknown types stay as text
            Some(_) => CellValue::string(raw),
        };
        Ok(Some(value))
    }

    fn finish_rule(&mut self, pending: PendingRule) {
        let operator = pending.operator.as_deref().and_then(CfOperator::from_xlsx);
        let rule_type = match pending.kind.as_str() {
            "dataBar" => {
                let mut thresholds = pending.thresholds.into_iter();
                CfRuleType::DataBar {
                    min_value: thresholds.next().unwrap_or_else(CfValue::min),
                    max_value: thresholds.next().unwrap_or_else(CfValue::max),
                    color: pending.color.unwrap_or_default(),
                }
            }
            "containsText" => CfRuleType::ContainsText {
                operator,
                text: pending.text,
            },
            "" => {
                log::warn!("skipping conditional format rule without a type");
                return;
            }
            kind => CfRuleType::Threshold {
                kind: kind.to_string(),
                operator,
                formulas: pending
                    .formulas
                    .iter()
                    .filter_map(|f| f.trim().parse::<f64>().ok())
                    .collect(),
            },
        };

        let mut rule = ConditionalFormatRule::new(rule_type).with_priority(pending.priority);
        rule.ranges = self.cf_ranges.clone();
        rule.stop_if_true = pending.stop_if_true;
        rule.format = pending
            .dxf_id
            .and_then(|id| self.styles.dxf_styles.get(id))
            .cloned();
        self.sheet.add_conditional_format(rule);
    }
}
