//! XLSX styles (styles.xml) read/write helpers

use std::collections::HashMap;
use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::XlsxResult;
use crate::writer::escape_xml;
use xlreport_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, PatternType, Style, Underline, VerticalAlignment,
};
use xlreport_core::Workbook;

// === Writing ===

#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index (xfId).
    styles: Vec<Style>,
    /// Per-worksheet mapping: local worksheet style index -> global xfId.
    sheet_maps: Vec<HashMap<u32, u32>>,
    /// Differential formats referenced by conditional formatting rules
    dxf_styles: Vec<Style>,
    /// (sheet_index, rule_index) -> dxf_id
    dxf_map: HashMap<(usize, usize), u32>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

impl XlsxStyleTable {
    pub(crate) fn build(workbook: &Workbook) -> Self {
        let mut styles: Vec<Style> = vec![Style::default()];
        let mut style_to_xf: HashMap<Style, u32> = HashMap::new();
        style_to_xf.insert(Style::default(), 0);

        let mut sheet_maps: Vec<HashMap<u32, u32>> = Vec::with_capacity(workbook.sheet_count());

        let mut dxf_styles: Vec<Style> = Vec::new();
        let mut dxf_map: HashMap<(usize, usize), u32> = HashMap::new();
        let mut dxf_style_to_id: HashMap<Style, u32> = HashMap::new();

        for (sheet_idx, sheet) in workbook.worksheets().enumerate() {
            let mut map: HashMap<u32, u32> = HashMap::new();
            map.insert(0, 0);

            for (_row, _col, cell) in sheet.iter_cells() {
                let local_idx = cell.style_index;
                if local_idx == 0 || map.contains_key(&local_idx) {
                    continue;
                }

                let style = sheet.style_by_index(local_idx).cloned().unwrap_or_default();
                let xf_id = *style_to_xf.entry(style.clone()).or_insert_with(|| {
                    styles.push(style);
                    styles.len() as u32 - 1
                });

                map.insert(local_idx, xf_id);
            }

            sheet_maps.push(map);

            for (rule_idx, rule) in sheet.conditional_formats().iter().enumerate() {
                if let Some(format) = &rule.format {
                    let dxf_id = *dxf_style_to_id.entry(format.clone()).or_insert_with(|| {
                        dxf_styles.push(format.clone());
                        dxf_styles.len() as u32 - 1
                    });
                    dxf_map.insert((sheet_idx, rule_idx), dxf_id);
                }
            }
        }

        Self {
            styles,
            sheet_maps,
            dxf_styles,
            dxf_map,
        }
    }

    pub(crate) fn xf_id_for(&self, sheet_index: usize, local_style_index: u32) -> u32 {
        self.sheet_maps
            .get(sheet_index)
            .and_then(|m| m.get(&local_style_index).copied())
            .unwrap_or(0)
    }

    /// DXF id of a conditional format rule, if the rule carries a format
    pub(crate) fn dxf_id_for(&self, sheet_index: usize, rule_index: usize) -> Option<u32> {
        self.dxf_map.get(&(sheet_index, rule_index)).copied()
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        // Font 0 is the workbook default font; fonts with nothing set share it.
        let mut font_ids: HashMap<&FontStyle, u32> = HashMap::new();
        let mut fonts: Vec<FontStyle> = vec![FontStyle::new()
            .with_name(FontStyle::DEFAULT_NAME)
            .with_size(FontStyle::DEFAULT_SIZE)];

        // Excel requires the first two fills to be none and gray125
        let mut fill_ids: HashMap<FillStyle, u32> = HashMap::new();
        let mut fills: Vec<FillStyle> = vec![
            FillStyle::default(),
            FillStyle {
                pattern: Some(PatternType::Gray125),
                ..FillStyle::default()
            },
        ];

        let mut border_ids: HashMap<&BorderStyle, u32> = HashMap::new();
        let mut borders: Vec<BorderStyle> = vec![BorderStyle::default()];

        let mut numfmt_ids: HashMap<&str, u32> = HashMap::new();
        let mut numfmts: Vec<(u32, &str)> = Vec::new();
        let mut next_numfmt_id = NumberFormat::FIRST_CUSTOM_ID;

        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = if style.font.is_unset() {
                0
            } else {
                *font_ids.entry(&style.font).or_insert_with(|| {
                    fonts.push(style.font.clone());
                    fonts.len() as u32 - 1
                })
            };

            let fill_id = if style.fill.is_none() {
                0
            } else {
                *fill_ids.entry(style.fill).or_insert_with(|| {
                    fills.push(style.fill);
                    fills.len() as u32 - 1
                })
            };

            let border_id = if style.border.is_empty() {
                0
            } else {
                *border_ids.entry(&style.border).or_insert_with(|| {
                    borders.push(style.border);
                    borders.len() as u32 - 1
                })
            };

            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => *numfmt_ids.entry(code.as_str()).or_insert_with(|| {
                    let id = next_numfmt_id;
                    next_numfmt_id += 1;
                    numfmts.push((id, code.as_str()));
                    id
                }),
            };

            resolved.push(ResolvedXfIds {
                font_id,
                fill_id,
                border_id,
                num_fmt_id,
            });
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape_xml(code)
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len()));
        for fill in &fills {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill, false));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(&format!("\n  <borders count=\"{}\">", borders.len()));
        for border in &borders {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for (style, ids) in self.styles.iter().zip(&resolved) {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>"#,
        );

        if self.dxf_styles.is_empty() {
            xml.push_str("\n  <dxfs count=\"0\"/>");
        } else {
            xml.push_str(&format!("\n  <dxfs count=\"{}\">", self.dxf_styles.len()));
            for dxf_style in &self.dxf_styles {
                xml.push_str("\n    ");
                xml.push_str(&write_dxf(dxf_style));
            }
            xml.push_str("\n  </dxfs>");
        }

        xml.push_str(
            r#"
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#,
        );

        xml.push_str("\n</styleSheet>");
        xml
    }
}

pub(crate) fn write_color(tag: &str, color: &Color) -> String {
    match color {
        Color::Auto => format!("<{tag} auto=\"1\"/>"),
        Color::Rgb { .. } | Color::Argb { .. } => {
            format!("<{tag} rgb=\"{}\"/>", color.argb_hex().unwrap_or_default())
        }
        Color::Indexed(i) => format!("<{tag} indexed=\"{i}\"/>"),
        Color::Theme { index, tint: 0 } => format!("<{tag} theme=\"{index}\"/>"),
        Color::Theme { index, tint } => {
            format!("<{tag} theme=\"{index}\" tint=\"{}\"/>", f64::from(*tint) / 100.0)
        }
    }
}

/// Only the attributes the font actually sets are written.
fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    if font.strikethrough {
        s.push_str("<strike/>");
    }
    match font.underline {
        Underline::None => {}
        Underline::Single => s.push_str("<u/>"),
        other => s.push_str(&format!("<u val=\"{}\"/>", other.as_str())),
    }
    if let Some(size) = font.size {
        s.push_str(&format!("<sz val=\"{size}\"/>"));
    }
    if let Some(color) = &font.color {
        s.push_str(&write_color("color", color));
    }
    if let Some(name) = &font.name {
        s.push_str(&format!("<name val=\"{}\"/>", escape_xml(name)));
    }
    s.push_str("</font>");
    s
}

/// In a dxf a solid fill paints with `bgColor`, so the start color is
/// repeated there when no end color is given.
fn write_fill(fill: &FillStyle, differential: bool) -> String {
    let pattern = match fill.pattern {
        None | Some(PatternType::None) => {
            return "<fill><patternFill patternType=\"none\"/></fill>".to_string()
        }
        Some(p) => p,
    };

    let mut s = format!("<fill><patternFill patternType=\"{}\"", pattern.as_str());
    let background = match (fill.end_color, differential, pattern) {
        (Some(c), _, _) => Some(c),
        (None, true, PatternType::Solid) => fill.start_color,
        _ => None,
    };
    if fill.start_color.is_none() && background.is_none() {
        s.push_str("/></fill>");
        return s;
    }
    s.push('>');
    if let Some(fg) = &fill.start_color {
        s.push_str(&write_color("fgColor", fg));
    }
    if let Some(bg) = &background {
        s.push_str(&write_color("bgColor", bg));
    }
    s.push_str("</patternFill></fill>");
    s
}

fn write_border_edge(tag: &str, edge: Option<&BorderEdge>) -> String {
    match edge {
        Some(e) if e.style != BorderLineStyle::None => {
            let mut s = format!("<{tag} style=\"{}\">", e.style.as_str());
            if let Some(color) = &e.color {
                s.push_str(&write_color("color", color));
            }
            s.push_str(&format!("</{tag}>"));
            s
        }
        _ => format!("<{tag}/>"),
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border>");
    for (side, edge) in border.sides() {
        s.push_str(&write_border_edge(side, edge));
    }
    s.push_str("<diagonal/></border>");
    s
}

fn write_alignment(al: &Alignment) -> String {
    if al.is_default() {
        return String::new();
    }

    let mut s = String::from("<alignment");
    if let Some(h) = al.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", h.as_str()));
    }
    if let Some(v) = al.vertical {
        s.push_str(&format!(" vertical=\"{}\"", v.as_str()));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    if al.shrink_to_fit {
        s.push_str(" shrinkToFit=\"1\"");
    }
    if al.indent != 0 {
        s.push_str(&format!(" indent=\"{}\"", al.indent));
    }
    if al.rotation != 0 {
        s.push_str(&format!(" textRotation=\"{}\"", al.rotation));
    }
    s.push_str("/>");
    s
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if ids.font_id != 0 {
        attrs.push_str(" applyFont=\"1\"");
    }
    if ids.fill_id != 0 {
        attrs.push_str(" applyFill=\"1\"");
    }
    if ids.border_id != 0 {
        attrs.push_str(" applyBorder=\"1\"");
    }
    if !style.alignment.is_default() {
        attrs.push_str(" applyAlignment=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id, attrs
    );

    let alignment_xml = write_alignment(&style.alignment);
    if alignment_xml.is_empty() {
        s.push_str("/>");
    } else {
        s.push('>');
        s.push_str(&alignment_xml);
        s.push_str("</xf>");
    }
    s
}

/// Differential formats carry font and fill only
fn write_dxf(style: &Style) -> String {
    let mut s = String::from("<dxf>");
    if !style.font.is_unset() {
        s.push_str(&write_font(&style.font));
    }
    if !style.fill.is_none() {
        s.push_str(&write_fill(&style.fill, true));
    }
    s.push_str("</dxf>");
    s
}

// === Reading ===

/// Cell formats (cellXfs order) and differential formats (dxfs order)
#[derive(Debug)]
pub(crate) struct ParsedStyles {
    pub cell_styles: Vec<Style>,
    pub dxf_styles: Vec<Style>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Default)]
struct XfRecord {
    num_fmt_id: u32,
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    alignment: Alignment,
}

/// Streaming state while walking styles.xml. Fonts, fills and borders land
/// in the current dxf when one is open, otherwise in the shared tables.
#[derive(Debug, Default)]
struct StylesParser {
    numfmts: HashMap<u32, String>,
    fonts: Vec<FontStyle>,
    fills: Vec<FillStyle>,
    borders: Vec<BorderStyle>,
    cell_xfs: Vec<Style>,
    dxf_styles: Vec<Style>,

    in_cell_xfs: bool,
    font: Option<FontStyle>,
    fill: Option<FillStyle>,
    border: Option<BorderStyle>,
    edge: Option<Side>,
    xf: Option<XfRecord>,
    dxf: Option<Style>,
}

pub(crate) fn read_styles_xml<R: Read>(reader: R) -> XlsxResult<ParsedStyles> {
    let mut xml_reader = Reader::from_reader(BufReader::new(reader));
    xml_reader.trim_text(true);

    let mut buf = Vec::new();
    let mut parser = StylesParser::default();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(e) => parser.open(&e),
            Event::Empty(e) => {
                parser.open(&e);
                parser.close(e.name().as_ref());
            }
            Event::End(e) => parser.close(e.name().as_ref()),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    let cell_styles = if parser.cell_xfs.is_empty() {
        vec![Style::default()]
    } else {
        parser.cell_xfs
    };

    Ok(ParsedStyles {
        cell_styles,
        dxf_styles: parser.dxf_styles,
    })
}

impl StylesParser {
    fn open(&mut self, e: &BytesStart<'_>) {
        match e.name().as_ref() {
            b"numFmt" => {
                if let (Some(id), Some(code)) = (
                    attr_value(e, b"numFmtId").and_then(|v| v.parse().ok()),
                    attr_value(e, b"formatCode"),
                ) {
                    self.numfmts.insert(id, code);
                }
            }
            b"cellXfs" => self.in_cell_xfs = true,
            b"xf" if self.in_cell_xfs => {
                let id = |key: &[u8]| {
                    attr_value(e, key)
                        .and_then(|v| v.parse().ok())
                        .unwrap_or(0)
                };
                self.xf = Some(XfRecord {
                    num_fmt_id: id(b"numFmtId"),
                    font_id: id(b"fontId"),
                    fill_id: id(b"fillId"),
                    border_id: id(b"borderId"),
                    alignment: Alignment::default(),
                });
            }
            b"alignment" => {
                if let Some(xf) = self.xf.as_mut() {
                    xf.alignment = parse_alignment(e);
                }
            }
            b"dxf" => self.dxf = Some(Style::default()),

            b"font" => self.font = Some(FontStyle::default()),
            b"b" | b"i" | b"strike" | b"u" | b"sz" | b"name" => {
                if let Some(font) = self.font.as_mut() {
                    apply_font_element(font, e);
                }
            }
            b"color" => {
                let color = parse_color_attrs(e);
                if let Some(font) = self.font.as_mut() {
                    font.color = Some(color);
                } else if let (Some(border), Some(side)) = (self.border.as_mut(), self.edge) {
                    if let Some(edge) = border_edge_mut(border, side).as_mut() {
                        edge.color = Some(color);
                    }
                }
            }

            b"fill" => self.fill = Some(FillStyle::default()),
            b"patternFill" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.pattern = attr_value(e, b"patternType")
                        .as_deref()
                        .and_then(PatternType::parse);
                }
            }
            b"fgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.start_color = Some(parse_color_attrs(e));
                }
            }
            b"bgColor" => {
                if let Some(fill) = self.fill.as_mut() {
                    fill.end_color = Some(parse_color_attrs(e));
                }
            }

            b"border" => self.border = Some(BorderStyle::default()),
            b"left" | b"right" | b"top" | b"bottom" | b"start" | b"end" => {
                let Some(border) = self.border.as_mut() else {
                    return;
                };
                let side = match e.name().as_ref() {
                    b"left" | b"start" => Side::Left,
                    b"right" | b"end" => Side::Right,
                    b"top" => Side::Top,
                    _ => Side::Bottom,
                };
                self.edge = Some(side);
                let style = attr_value(e, b"style")
                    .as_deref()
                    .and_then(BorderLineStyle::parse)
                    .filter(|s| *s != BorderLineStyle::None);
                if let Some(style) = style {
                    *border_edge_mut(border, side) = Some(BorderEdge::new(style, None));
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"font" => {
                if let Some(font) = self.font.take() {
                    match self.dxf.as_mut() {
                        Some(dxf) => dxf.font = font,
                        None => self.fonts.push(font),
                    }
                }
            }
            b"fill" => {
                if let Some(fill) = self.fill.take() {
                    match self.dxf.as_mut() {
                        Some(dxf) => dxf.fill = fill,
                        None => self.fills.push(fill),
                    }
                }
            }
            b"border" => {
                if let Some(border) = self.border.take() {
                    match self.dxf.as_mut() {
                        Some(dxf) => dxf.border = border,
                        None => self.borders.push(border),
                    }
                }
                self.edge = None;
            }
            b"left" | b"right" | b"top" | b"bottom" | b"start" | b"end" => self.edge = None,
            b"xf" => {
                if let Some(xf) = self.xf.take() {
                    let style = self.resolve(xf);
                    self.cell_xfs.push(style);
                }
            }
            b"cellXfs" => self.in_cell_xfs = false,
            b"dxf" => {
                if let Some(dxf) = self.dxf.take() {
                    self.dxf_styles.push(dxf);
                }
            }
            _ => {}
        }
    }

    fn resolve(&self, xf: XfRecord) -> Style {
        // Font 0 is the workbook default, which no cell sets explicitly
        let font = match xf.font_id {
            0 => FontStyle::default(),
            id => self.fonts.get(id as usize).cloned().unwrap_or_default(),
        };
        // Fills 0 and 1 are the reserved none and gray125 entries
        let fill = match xf.fill_id {
            0 | 1 => FillStyle::default(),
            id => self
                .fills
                .get(id as usize)
                .copied()
                .filter(|f| !f.is_none())
                .unwrap_or_default(),
        };
        let number_format = match self.numfmts.get(&xf.num_fmt_id) {
            Some(code) => NumberFormat::Custom(code.clone()),
            None => NumberFormat::from_id(xf.num_fmt_id),
        };

        Style {
            font,
            fill,
            border: self
                .borders
                .get(xf.border_id as usize)
                .copied()
                .unwrap_or_default(),
            alignment: xf.alignment,
            number_format,
        }
    }
}

pub(crate) fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

/// `<b/>` means on; `<b val="0"/>` means off
fn flag_attr(e: &BytesStart<'_>) -> bool {
    !matches!(attr_value(e, b"val").as_deref(), Some("0" | "false"))
}

fn apply_font_element(font: &mut FontStyle, e: &BytesStart<'_>) {
    match e.name().as_ref() {
        b"b" => font.bold = flag_attr(e),
        b"i" => font.italic = flag_attr(e),
        b"strike" => font.strikethrough = flag_attr(e),
        b"u" => {
            font.underline = attr_value(e, b"val")
                .as_deref()
                .map_or(Some(Underline::Single), Underline::parse)
                .unwrap_or(Underline::Single);
        }
        b"sz" => {
            if let Some(size) = attr_value(e, b"val").and_then(|v| v.parse().ok()) {
                font.size = Some(size);
            }
        }
        b"name" => font.name = attr_value(e, b"val"),
        _ => {}
    }
}

fn parse_alignment(e: &BytesStart<'_>) -> Alignment {
    let mut align = Alignment::default();
    for attr in e.attributes().flatten() {
        let Ok(val) = attr.unescape_value() else {
            continue;
        };
        match attr.key.as_ref() {
            b"horizontal" => align.horizontal = HorizontalAlignment::parse(&val),
            b"vertical" => align.vertical = VerticalAlignment::parse(&val),
            b"wrapText" => align.wrap_text = matches!(val.as_ref(), "1" | "true"),
            b"shrinkToFit" => align.shrink_to_fit = matches!(val.as_ref(), "1" | "true"),
            b"indent" => align.indent = val.parse().unwrap_or(0),
            b"textRotation" => align.rotation = val.parse().unwrap_or(0),
            _ => {}
        }
    }
    align
}

/// Priority: rgb > theme > indexed > auto
pub(crate) fn parse_color_attrs(e: &BytesStart<'_>) -> Color {
    if let Some(color) = attr_value(e, b"rgb").as_deref().and_then(Color::from_hex) {
        return color;
    }
    if let Some(index) = attr_value(e, b"theme").and_then(|v| v.parse::<u8>().ok()) {
        let tint = attr_value(e, b"tint")
            .and_then(|v| v.parse::<f64>().ok())
            .map_or(0, |t| (t * 100.0).round() as i8);
        return Color::Theme { index, tint };
    }
    if let Some(i) = attr_value(e, b"indexed").and_then(|v| v.parse::<u8>().ok()) {
        return Color::Indexed(i);
    }
    Color::Auto
}

fn border_edge_mut(border: &mut BorderStyle, side: Side) -> &mut Option<BorderEdge> {
    match side {
        Side::Left => &mut border.left,
        Side::Right => &mut border.right,
        Side::Top => &mut border.top,
        Side::Bottom => &mut border.bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table_for(styles: &[Style]) -> XlsxStyleTable {
        let mut wb = Workbook::new();
        let sheet = wb.worksheet_mut(0).unwrap();
        for (i, style) in styles.iter().enumerate() {
            sheet.set_cell_value_at(i as u32, 0, "x").unwrap();
            sheet.set_cell_style_at(i as u32, 0, style).unwrap();
        }
        XlsxStyleTable::build(&wb)
    }

    #[test]
    fn test_default_font_is_written_in_full() {
        let xml = table_for(&[]).to_styles_xml();
        assert!(xml.contains("<font><sz val=\"11\"/><name val=\"Calibri\"/></font>"));
        assert!(xml.contains("patternType=\"gray125\""));
    }

    #[test]
    fn test_partial_font_writes_only_set_attributes() {
        let xml = table_for(&[Style::new().bold(true)]).to_styles_xml();
        assert!(xml.contains("<font><b/></font>"));
        assert!(xml.contains("fontId=\"1\""));
    }

    #[test]
    fn test_identical_styles_share_an_xf() {
        let style = Style::new().fill_color(Color::rgb(255, 0, 0));
        let table = table_for(&[style.clone(), style]);
        assert_eq!(table.xf_id_for(0, 1), 1);
        assert_eq!(table.styles.len(), 2);
    }

    #[test]
    fn test_custom_number_formats_start_at_164() {
        let xml = table_for(&[Style::new().number_format("#,##0.000 \"u\"")]).to_styles_xml();
        assert!(xml.contains("<numFmt numFmtId=\"164\" formatCode=\"#,##0.000 &quot;u&quot;\"/>"));
    }

    #[test]
    fn test_written_styles_read_back() {
        let style = Style {
            font: FontStyle::new()
                .with_name("Arial")
                .with_size(14.0)
                .with_bold(true)
                .with_color(Color::rgb(0x11, 0x22, 0x33)),
            fill: FillStyle::solid(Color::rgb(255, 255, 0)),
            border: BorderStyle {
                left: Some(BorderEdge::new(BorderLineStyle::Thin, Some(Color::BLACK))),
                bottom: Some(BorderEdge::new(BorderLineStyle::Double, None)),
                ..BorderStyle::default()
            },
            alignment: Alignment::new()
                .with_horizontal(HorizontalAlignment::Center)
                .with_wrap(true),
            number_format: NumberFormat::from_code("0.00"),
        };
        let xml = table_for(&[style.clone(), Style::new().italic(true)]).to_styles_xml();
        let parsed = read_styles_xml(xml.as_bytes()).unwrap();

        assert_eq!(parsed.cell_styles.len(), 3);
        assert_eq!(parsed.cell_styles[0], Style::default());
        assert_eq!(
            parsed.cell_styles[1].fill.start_color,
            Some(Color::argb(0xFF, 255, 255, 0))
        );
        assert_eq!(parsed.cell_styles[1].font.name.as_deref(), Some("Arial"));
        assert_eq!(parsed.cell_styles[1].font.size, Some(14.0));
        assert_eq!(parsed.cell_styles[1].border.left.unwrap().style, BorderLineStyle::Thin);
        assert_eq!(parsed.cell_styles[1].border.bottom.unwrap().color, None);
        assert_eq!(parsed.cell_styles[1].alignment, style.alignment);
        assert_eq!(parsed.cell_styles[1].number_format.format_string(), "0.00");
        assert_eq!(parsed.cell_styles[2].font, FontStyle::new().with_italic(true));
    }

    #[test]
    fn test_explicit_gray125_fill_reads_back() {
        let gray = Style {
            fill: FillStyle {
                pattern: Some(PatternType::Gray125),
                ..FillStyle::default()
            },
            ..Style::default()
        };
        let xml = table_for(&[gray]).to_styles_xml();
        assert!(xml.contains("fillId=\"2\""));

        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed.cell_styles[1].fill.pattern, Some(PatternType::Gray125));
    }

    #[test]
    fn test_builtin_number_format_without_record() {
        let xml = r#"<styleSheet><fonts count="1"><font><sz val="11"/></font></fonts>
            <fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>
            <cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
            <xf numFmtId="44" fontId="0" fillId="1" borderId="0" applyNumberFormat="1"/></cellXfs></styleSheet>"#;
        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed.cell_styles[1].number_format, NumberFormat::BuiltIn(44));
        assert!(!parsed.cell_styles[1].number_format.is_general());
        assert_eq!(parsed.cell_styles[1].fill, FillStyle::default());
    }

    #[test]
    fn test_dxf_solid_fill_repeats_color_as_background() {
        let dxf = write_dxf(&Style::new().fill_color(Color::rgb(0xFF, 0xC7, 0xCE)));
        assert_eq!(
            dxf,
            "<dxf><fill><patternFill patternType=\"solid\"><fgColor rgb=\"FFFFC7CE\"/><bgColor rgb=\"FFFFC7CE\"/></patternFill></fill></dxf>"
        );
    }

    #[test]
    fn test_read_dxfs() {
        let xml = r#"<styleSheet><fonts count="1"><font><sz val="11"/></font></fonts>
            <dxfs count="1"><dxf><font><b/><color rgb="FF9C0006"/></font></dxf></dxfs></styleSheet>"#;
        let parsed = read_styles_xml(xml.as_bytes()).unwrap();
        assert_eq!(parsed.dxf_styles.len(), 1);
        assert!(parsed.dxf_styles[0].font.bold);
        assert_eq!(
            parsed.dxf_styles[0].font.color,
            Some(Color::argb(0xFF, 0x9C, 0, 0x06))
        );
    }
}
