//! Conditional formatting
//!
//! Rules are attached to a worksheet and written out with the sheet. Only
//! the font and fill of a rule's `format` are used; they become the rule's
//! differential style.
//!
//! ## Example
//!
//! ```rust
//! use xlreport_core::{CellRange, CfOperator, ConditionalFormatRule, Workbook};
//! use xlreport_core::style::{Color, Style};
//!
//! let mut workbook = Workbook::new();
//! let sheet = workbook.worksheet_mut(0).unwrap();
//!
//! // Highlight cells greater than 100
//! let rule = ConditionalFormatRule::cell_is(CfOperator::GreaterThan, vec![100.0])
//!     .with_range(CellRange::parse("A1:A10").unwrap())
//!     .with_format(Style::new().fill_color(Color::rgb(255, 199, 206)));
//!
//! sheet.add_conditional_format(rule);
//! assert_eq!(sheet.conditional_formats().len(), 1);
//! ```

use crate::cell::CellRange;
use crate::style::{Color, Style};

/// A conditional formatting rule
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalFormatRule {
    pub rule_type: CfRuleType,
    /// Cell ranges this rule applies to
    pub ranges: Vec<CellRange>,
    /// Priority (lower = higher priority); assigned by the worksheet when 0
    pub priority: u32,
    /// Stop processing further rules if this one matches
    pub stop_if_true: bool,
    /// Differential style applied when the rule matches
    pub format: Option<Style>,
}

impl ConditionalFormatRule {
    pub fn new(rule_type: CfRuleType) -> Self {
        Self {
            rule_type,
            ranges: Vec::new(),
            priority: 0,
            stop_if_true: false,
            format: None,
        }
    }

    /// Comparison of the cell value against numeric thresholds
    pub fn cell_is(operator: CfOperator, formulas: Vec<f64>) -> Self {
        Self::new(CfRuleType::Threshold {
            kind: "cellIs".to_string(),
            operator: Some(operator),
            formulas,
        })
    }

    /// Highlight cells containing `text`
    pub fn contains_text(text: impl Into<String>) -> Self {
        Self::new(CfRuleType::ContainsText {
            operator: Some(CfOperator::ContainsText),
            text: Some(text.into()),
        })
    }

    /// In-cell bar scaled from the range minimum to its maximum
    pub fn data_bar(color: Color) -> Self {
        Self::new(CfRuleType::DataBar {
            min_value: CfValue::min(),
            max_value: CfValue::max(),
            color,
        })
    }

    pub fn with_range(mut self, range: CellRange) -> Self {
        self.ranges.push(range);
        self
    }

    pub fn with_format(mut self, style: Style) -> Self {
        self.format = Some(style);
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Check if this rule applies to a specific cell
    pub fn applies_to(&self, row: u32, col: u16) -> bool {
        self.ranges.iter().any(|r| r.contains(row, col))
    }
}

/// Kinds of conditional formatting rules
#[derive(Debug, Clone, PartialEq)]
pub enum CfRuleType {
    /// Rule driven by numeric thresholds (`cellIs` and any other kind that
    /// takes `<formula>` children), written with its kind verbatim
    Threshold {
        kind: String,
        operator: Option<CfOperator>,
        formulas: Vec<f64>,
    },

    /// Text match; a rule without text matches nothing in particular
    ContainsText {
        operator: Option<CfOperator>,
        text: Option<String>,
    },

    /// Data bar (in-cell bar chart)
    DataBar {
        min_value: CfValue,
        max_value: CfValue,
        color: Color,
    },
}

impl CfRuleType {
    /// The `type` attribute of the `<cfRule>` element
    pub fn xlsx_type(&self) -> &str {
        match self {
            CfRuleType::Threshold { kind, .. } => kind,
            CfRuleType::ContainsText { .. } => "containsText",
            CfRuleType::DataBar { .. } => "dataBar",
        }
    }

    pub fn operator(&self) -> Option<CfOperator> {
        match self {
            CfRuleType::Threshold { operator, .. } | CfRuleType::ContainsText { operator, .. } => {
                *operator
            }
            CfRuleType::DataBar { .. } => None,
        }
    }
}

/// Comparison operators for `cellIs` and text rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CfOperator {
    #[default]
    Between,
    NotBetween,
    Equal,
    NotEqual,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    BeginsWith,
    EndsWith,
    ContainsText,
    NotContains,
}

impl CfOperator {
    /// Get the XLSX operator string
    pub fn xlsx_operator(&self) -> &'static str {
        match self {
            CfOperator::Between => "between",
            CfOperator::NotBetween => "notBetween",
            CfOperator::Equal => "equal",
            CfOperator::NotEqual => "notEqual",
            CfOperator::GreaterThan => "greaterThan",
            CfOperator::LessThan => "lessThan",
            CfOperator::GreaterThanOrEqual => "greaterThanOrEqual",
            CfOperator::LessThanOrEqual => "lessThanOrEqual",
            CfOperator::BeginsWith => "beginsWith",
            CfOperator::EndsWith => "endsWith",
            CfOperator::ContainsText => "containsText",
            CfOperator::NotContains => "notContains",
        }
    }

    /// Parse from XLSX operator string
    pub fn from_xlsx(s: &str) -> Option<Self> {
        match s {
            "between" => Some(CfOperator::Between),
            "notBetween" => Some(CfOperator::NotBetween),
            "equal" => Some(CfOperator::Equal),
            "notEqual" => Some(CfOperator::NotEqual),
            "greaterThan" => Some(CfOperator::GreaterThan),
            "lessThan" => Some(CfOperator::LessThan),
            "greaterThanOrEqual" => Some(CfOperator::GreaterThanOrEqual),
            "lessThanOrEqual" => Some(CfOperator::LessThanOrEqual),
            "beginsWith" => Some(CfOperator::BeginsWith),
            "endsWith" => Some(CfOperator::EndsWith),
            "containsText" => Some(CfOperator::ContainsText),
            "notContains" => Some(CfOperator::NotContains),
            _ => None,
        }
    }
}

/// Threshold of a data bar
#[derive(Debug, Clone, PartialEq)]
pub struct CfValue {
    pub value_type: CfValueType,
    pub value: Option<String>,
}

impl CfValue {
    pub fn new(value_type: CfValueType, value: Option<String>) -> Self {
        Self { value_type, value }
    }

    pub fn min() -> Self {
        Self::new(CfValueType::Min, None)
    }

    pub fn max() -> Self {
        Self::new(CfValueType::Max, None)
    }
}

/// Value types for conditional format thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CfValueType {
    #[default]
    Min,
    Max,
    Num,
    Percent,
    Percentile,
    Formula,
}

impl CfValueType {
    pub fn xlsx_type(&self) -> &'static str {
        match self {
            CfValueType::Min => "min",
            CfValueType::Max => "max",
            CfValueType::Num => "num",
            CfValueType::Percent => "percent",
            CfValueType::Percentile => "percentile",
            CfValueType::Formula => "formula",
        }
    }

    pub fn from_xlsx(s: &str) -> Option<Self> {
        match s {
            "min" => Some(CfValueType::Min),
            "max" => Some(CfValueType::Max),
            "num" => Some(CfValueType::Num),
            "percent" => Some(CfValueType::Percent),
            "percentile" => Some(CfValueType::Percentile),
            "formula" => Some(CfValueType::Formula),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip() {
        for op in [
            CfOperator::Between,
            CfOperator::GreaterThanOrEqual,
            CfOperator::BeginsWith,
            CfOperator::NotContains,
        ] {
            assert_eq!(CfOperator::from_xlsx(op.xlsx_operator()), Some(op));
        }
        assert_eq!(CfOperator::from_xlsx("greater"), None);
    }

    #[test]
    fn test_data_bar_spans_min_to_max() {
        let rule = ConditionalFormatRule::data_bar(Color::rgb(0x63, 0x8E, 0xC6));
        match &rule.rule_type {
            CfRuleType::DataBar {
                min_value,
                max_value,
                ..
            } => {
                assert_eq!(min_value.value_type, CfValueType::Min);
                assert_eq!(max_value.value_type, CfValueType::Max);
            }
            other => panic!("unexpected rule type {other:?}"),
        }
        assert_eq!(rule.rule_type.operator(), None);
    }

    #[test]
    fn test_threshold_kind_passes_through() {
        let rule = ConditionalFormatRule::new(CfRuleType::Threshold {
            kind: "top10".into(),
            operator: None,
            formulas: vec![5.0],
        });
        assert_eq!(rule.rule_type.xlsx_type(), "top10");
    }

    #[test]
    fn test_applies_to() {
        let rule = ConditionalFormatRule::contains_text("Urgent")
            .with_range(CellRange::parse("B2:B4").unwrap());
        assert!(rule.applies_to(2, 1));
        assert!(!rule.applies_to(4, 1));
    }
}
