//! JSON document model
//!
//! [`ReportDocument`] is the build input and [`ExtractedDocument`] the parse
//! output. The style objects are shared by both directions: the build side
//! accepts a few aliases (`pattern`, `sz`, `fgColor`...) while the parse side
//! always emits canonical keys and omits anything that is not set.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReportError, Result};
use xlreport_core::CellValue;

/// Build input: rows of cells plus merges, conditional rules and charts
///
/// Conditional rules and charts stay as raw JSON so that each entry can be
/// decoded (and skipped) on its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportDocument {
    pub rows: Vec<Vec<CellSpec>>,
    pub merge_cells: Vec<String>,
    pub conditional_rules: Vec<Value>,
    pub charts: Vec<Value>,
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(rename = "analysisData")]
    analysis_data: Vec<Vec<Value>>,
    #[serde(rename = "mergeCells", default)]
    merge_cells: Vec<String>,
    #[serde(rename = "conditionalFormattingRules", default)]
    conditional_formatting_rules: Vec<Value>,
    #[serde(default)]
    charts: Vec<Value>,
}

impl ReportDocument {
    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ReportError::malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Parse a document from a JSON value
    ///
    /// Row entries that are not objects or have no string `address` are
    /// ignored. A cell `value` that is an array or object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ReportError::malformed("document must be a JSON object"));
        }
        let raw: RawDocument =
            serde_json::from_value(value).map_err(|e| ReportError::malformed(e.to_string()))?;

        let rows = raw
            .analysis_data
            .iter()
            .map(|row| {
                row.iter()
                    .filter_map(|entry| CellSpec::from_entry(entry).transpose())
                    .collect::<Result<Vec<_>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            rows,
            merge_cells: raw.merge_cells,
            conditional_rules: raw.conditional_formatting_rules,
            charts: raw.charts,
        })
    }

    /// All cells in document order
    pub fn cells(&self) -> impl Iterator<Item = &CellSpec> {
        self.rows.iter().flatten()
    }
}

/// One cell of the build input
#[derive(Debug, Clone, PartialEq)]
pub struct CellSpec {
    pub address: String,
    pub value: CellValue,
    /// Raw style object, decoded by [`StyleCodec`](crate::StyleCodec) when applied
    pub style: Option<Value>,
}

impl CellSpec {
    pub fn new<A: Into<String>, V: Into<CellValue>>(address: A, value: V) -> Self {
        Self {
            address: address.into(),
            value: value.into(),
            style: None,
        }
    }

    pub fn with_style(mut self, style: Value) -> Self {
        self.style = Some(style);
        self
    }

    fn from_entry(entry: &Value) -> Result<Option<Self>> {
        let Some(object) = entry.as_object() else {
            return Ok(None);
        };
        let Some(address) = object.get("address").and_then(Value::as_str) else {
            return Ok(None);
        };

        let value = match object.get("value") {
            None => CellValue::Empty,
            Some(v) => json_to_cell_value(v).ok_or_else(|| {
                ReportError::malformed(format!(
                    "cell {address}: value must be null, a string, a number or a boolean"
                ))
            })?,
        };

        Ok(Some(Self {
            address: address.to_string(),
            value,
            style: object.get("style").filter(|s| !s.is_null()).cloned(),
        }))
    }
}

/// Scalar JSON to a cell value; strings are kept literally
pub fn json_to_cell_value(value: &Value) -> Option<CellValue> {
    match value {
        Value::Null => Some(CellValue::Empty),
        Value::Bool(b) => Some(CellValue::Boolean(*b)),
        Value::Number(n) => n.as_f64().map(CellValue::Number),
        Value::String(s) => Some(CellValue::string(s.as_str())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// JSON form of a cell's computed value
///
/// Integral numbers within ±2^53 become JSON integers; errors become their
/// literal text.
pub fn cell_value_to_json(value: &CellValue) -> Value {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;

    match value.computed() {
        CellValue::Empty | CellValue::Formula { .. } => Value::Null,
        CellValue::Boolean(b) => Value::Bool(*b),
        CellValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT => {
            Value::from(*n as i64)
        }
        CellValue::Number(n) => serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
        CellValue::String(s) => Value::String(s.as_str().to_string()),
        CellValue::Error(e) => Value::String(e.as_str().to_string()),
    }
}

/// Style object of a cell
///
/// Unknown top-level keys are ignored; unknown keys inside a category are
/// rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<AlignmentSpec>,
    #[serde(rename = "numFmt", default, skip_serializing_if = "Option::is_none")]
    pub num_fmt: Option<String>,
}

impl StyleSpec {
    pub fn is_empty(&self) -> bool {
        *self == StyleSpec::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FontSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "sz", skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(default, alias = "b", skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(default, alias = "i", skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl FontSpec {
    pub fn is_empty(&self) -> bool {
        *self == FontSpec::default()
    }
}

/// Pattern fill; written back under `pattern`, accepted as `fill_type` too
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FillSpec {
    #[serde(
        rename(serialize = "pattern", deserialize = "fill_type"),
        alias = "pattern",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub fill_type: Option<String>,
    #[serde(default, alias = "fgColor", skip_serializing_if = "Option::is_none")]
    pub start_color: Option<String>,
    #[serde(default, alias = "bgColor", skip_serializing_if = "Option::is_none")]
    pub end_color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderSideSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderSideSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderSideSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderSideSpec>,
}

impl BorderSpec {
    pub fn is_empty(&self) -> bool {
        *self == BorderSpec::default()
    }
}

/// One border side; `color` is emitted as `null` when the side has none
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BorderSideSpec {
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlignmentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_text: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shrink_to_fit: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_rotation: Option<u8>,
}

impl AlignmentSpec {
    pub fn is_empty(&self) -> bool {
        *self == AlignmentSpec::default()
    }
}

/// A conditional formatting entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleSpec {
    /// Target range(s), space separated
    #[serde(rename = "ref")]
    pub range: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub operator: Option<String>,
    /// Thresholds for numeric rules, match text for `containsText`
    #[serde(default)]
    pub formulae: Option<Vec<Value>>,
    /// Font and fill of the differential style
    #[serde(default)]
    pub style: Option<Value>,
    /// Data bar color
    #[serde(default)]
    pub color: Option<String>,
}

fn default_true() -> bool {
    true
}

/// A chart entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChartSpec {
    /// `bar`, `col`, `line` or `pie`; absent means `bar`
    #[serde(rename = "type", default)]
    pub chart_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub style: Option<u8>,
    #[serde(default)]
    pub x_axis_title: Option<String>,
    #[serde(default)]
    pub y_axis_title: Option<String>,
    #[serde(default)]
    pub data_range: Option<String>,
    #[serde(default)]
    pub category_range: Option<String>,
    #[serde(default = "default_true")]
    pub titles_from_data: bool,
    #[serde(default)]
    pub position: Option<String>,
}

/// Parse output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub sheets: Vec<ExtractedSheet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSheet {
    pub name: String,
    pub data: Vec<Vec<CellInfo>>,
    pub merged_cells: Vec<String>,
}

impl ExtractedSheet {
    /// Look up a cell of the grid by address
    pub fn cell(&self, address: &str) -> Option<&CellInfo> {
        self.data.iter().flatten().find(|c| c.address == address)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// One extracted cell: merge members carry `is_merged_part` and no style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellInfo {
    pub address: String,
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleSpec>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_merged_part: bool,
}
