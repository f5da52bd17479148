//! Mapping between JSON style objects and cell styles
//!
//! Applying a style only sets the categories the JSON names; the others keep
//! what the cell already has. Extraction is the reverse and deliberately lossy: it
//! emits only the attributes that are set on the cell, always under their
//! canonical keys, with colors as 8-digit ARGB hex.

use serde::Deserialize;
use serde_json::Value;

use crate::document::{
    AlignmentSpec, BorderSideSpec, BorderSpec, FillSpec, FontSpec, StyleSpec,
};
use crate::error::StyleSpecError;
use xlreport_core::style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, PatternType, Style, Underline, VerticalAlignment,
};
use xlreport_core::Worksheet;

type Result<T> = std::result::Result<T, StyleSpecError>;

/// Stateless codec between [`StyleSpec`] and [`Style`]
pub struct StyleCodec;

impl StyleCodec {
    /// Decode a raw JSON style object
    pub fn decode(value: &Value) -> Result<StyleSpec> {
        if !value.is_object() {
            return Err(StyleSpecError(format!("style must be an object, got {value}")));
        }
        Ok(StyleSpec::deserialize(value)?)
    }

    /// Build the full cell style described by `spec`
    pub fn to_style(spec: &StyleSpec) -> Result<Style> {
        Self::overlay(Style::new(), spec)
    }

    /// Replace the categories `spec` names on `style`; the others are kept
    pub fn overlay(mut style: Style, spec: &StyleSpec) -> Result<Style> {
        if let Some(font) = &spec.font {
            style.font = font_style(font)?;
        }
        if let Some(fill) = &spec.fill {
            style.fill = fill_style(fill)?;
        }
        if let Some(border) = &spec.border {
            style.border = border_style(border)?;
        }
        if let Some(alignment) = &spec.alignment {
            style.alignment = alignment_style(alignment)?;
        }
        if let Some(code) = &spec.num_fmt {
            style.number_format = NumberFormat::from_code(code);
        }
        Ok(style)
    }

    /// Build a differential style: only font and fill are kept
    pub fn differential_style(spec: &StyleSpec) -> Result<Style> {
        let mut style = Style::new();
        if let Some(font) = &spec.font {
            style.font = font_style(font)?;
        }
        if let Some(fill) = &spec.fill {
            style.fill = fill_style(fill)?;
        }
        Ok(style)
    }

    /// Apply a raw JSON style object to one cell
    ///
    /// Categories the object leaves out keep what the cell already has.
    /// Applying the same object twice leaves the cell unchanged.
    pub fn apply_style(sheet: &mut Worksheet, row: u32, col: u16, value: &Value) -> Result<()> {
        let current = sheet.cell_style_at(row, col).cloned().unwrap_or_default();
        let style = Self::overlay(current, &Self::decode(value)?)?;
        sheet
            .set_cell_style_at(row, col, &style)
            .map_err(|e| StyleSpecError(e.to_string()))
    }

    /// Describe the set attributes of a cell style
    ///
    /// `None` (a cell without an explicit style) gives an empty object.
    pub fn extract_style(style: Option<&Style>) -> StyleSpec {
        let Some(style) = style else {
            return StyleSpec::default();
        };

        let font = extract_font(&style.font);
        let border = extract_border(&style.border);
        let alignment = extract_alignment(&style.alignment);

        StyleSpec {
            font: (!font.is_empty()).then_some(font),
            fill: extract_fill(&style.fill),
            border: (!border.is_empty()).then_some(border),
            alignment: (!alignment.is_empty()).then_some(alignment),
            num_fmt: (!style.number_format.is_general())
                .then(|| style.number_format.format_string().to_string()),
        }
    }
}

fn parse_color(text: &str) -> Result<Color> {
    Color::from_hex(text).ok_or_else(|| StyleSpecError(format!("invalid color '{text}'")))
}

fn keyword<T>(kind: &str, text: &str, parse: impl Fn(&str) -> Option<T>) -> Result<T> {
    parse(text).ok_or_else(|| StyleSpecError(format!("unknown {kind} '{text}'")))
}

fn font_style(spec: &FontSpec) -> Result<FontStyle> {
    let mut font = FontStyle::new();
    font.name = spec.name.clone();
    font.size = spec.size;
    font.bold = spec.bold.unwrap_or(false);
    font.italic = spec.italic.unwrap_or(false);
    font.strikethrough = spec.strike.unwrap_or(false);
    if let Some(underline) = &spec.underline {
        font.underline = keyword("underline", underline, Underline::parse)?;
    }
    font.color = spec.color.as_deref().map(parse_color).transpose()?;
    Ok(font)
}

fn fill_style(spec: &FillSpec) -> Result<FillStyle> {
    Ok(FillStyle {
        pattern: spec
            .fill_type
            .as_deref()
            .map(|p| keyword("fill pattern", p, PatternType::parse))
            .transpose()?,
        start_color: spec.start_color.as_deref().map(parse_color).transpose()?,
        end_color: spec.end_color.as_deref().map(parse_color).transpose()?,
    })
}

fn border_edge(spec: Option<&BorderSideSpec>) -> Result<Option<BorderEdge>> {
    let Some(side) = spec else {
        return Ok(None);
    };
    let style = match side.style.as_deref() {
        None => return Ok(None),
        Some(s) => keyword("border style", s, BorderLineStyle::parse)?,
    };
    if style == BorderLineStyle::None {
        return Ok(None);
    }
    let color = side.color.as_deref().map(parse_color).transpose()?;
    Ok(Some(BorderEdge::new(style, color)))
}

fn border_style(spec: &BorderSpec) -> Result<BorderStyle> {
    Ok(BorderStyle {
        left: border_edge(spec.left.as_ref())?,
        right: border_edge(spec.right.as_ref())?,
        top: border_edge(spec.top.as_ref())?,
        bottom: border_edge(spec.bottom.as_ref())?,
    })
}

fn alignment_style(spec: &AlignmentSpec) -> Result<Alignment> {
    Ok(Alignment {
        horizontal: spec
            .horizontal
            .as_deref()
            .map(|h| keyword("horizontal alignment", h, HorizontalAlignment::parse))
            .transpose()?,
        vertical: spec
            .vertical
            .as_deref()
            .map(|v| keyword("vertical alignment", v, VerticalAlignment::parse))
            .transpose()?,
        wrap_text: spec.wrap_text.unwrap_or(false),
        shrink_to_fit: spec.shrink_to_fit.unwrap_or(false),
        indent: spec.indent.unwrap_or(0),
        rotation: spec.text_rotation.unwrap_or(0),
    })
}

fn extract_font(font: &FontStyle) -> FontSpec {
    FontSpec {
        name: font.name.clone().filter(|n| !n.is_empty()),
        size: font.size.filter(|s| *s > 0.0),
        bold: font.bold.then_some(true),
        italic: font.italic.then_some(true),
        color: font.color.and_then(|c| c.argb_hex()),
        ..FontSpec::default()
    }
}

fn extract_fill(fill: &FillStyle) -> Option<FillSpec> {
    let pattern = fill.pattern.filter(|p| *p != PatternType::None)?;
    Some(FillSpec {
        fill_type: Some(pattern.as_str().to_string()),
        start_color: fill.start_color.and_then(|c| c.argb_hex()),
        end_color: fill.end_color.and_then(|c| c.argb_hex()),
    })
}

fn extract_border(border: &BorderStyle) -> BorderSpec {
    let side = |edge: Option<&BorderEdge>| {
        edge.filter(|e| e.style != BorderLineStyle::None)
            .map(|e| BorderSideSpec {
                style: Some(e.style.as_str().to_string()),
                color: e.color.and_then(|c| c.argb_hex()),
            })
    };
    BorderSpec {
        left: side(border.left.as_ref()),
        right: side(border.right.as_ref()),
        top: side(border.top.as_ref()),
        bottom: side(border.bottom.as_ref()),
    }
}

fn extract_alignment(alignment: &Alignment) -> AlignmentSpec {
    AlignmentSpec {
        horizontal: alignment.horizontal.map(|h| h.as_str().to_string()),
        vertical: alignment.vertical.map(|v| v.as_str().to_string()),
        wrap_text: alignment.wrap_text.then_some(true),
        ..AlignmentSpec::default()
    }
}
