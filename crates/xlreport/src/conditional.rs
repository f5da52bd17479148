//! Conditional formatting entries to worksheet rules
//!
//! Three shapes are recognised:
//! - `dataBar`: a bar from the range minimum to its maximum; `formulae`,
//!   `operator` and `style` do not apply.
//! - `containsText`: the first element of `formulae` is the match text.
//! - anything else (`cellIs`, `top10`...): `formulae` are numeric thresholds.
//!   Entries that do not read as numbers are dropped one by one; a rule with
//!   nothing left is skipped.

use serde::Deserialize;
use serde_json::Value;

use crate::config::ReportConfig;
use crate::document::RuleSpec;
use crate::outcome::{RuleOutcome, SkipReason};
use crate::style_codec::StyleCodec;
use xlreport_core::conditional_format::{CfOperator, CfRuleType, ConditionalFormatRule};
use xlreport_core::style::Color;
use xlreport_core::CellRange;

/// Builds worksheet rules from [`RuleSpec`]s
pub struct ConditionalFormatCodec<'a> {
    config: &'a ReportConfig,
}

impl<'a> ConditionalFormatCodec<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Decode a raw JSON entry, then build it
    pub fn build_rule_value(&self, value: &Value) -> RuleOutcome {
        match RuleSpec::deserialize(value) {
            Ok(spec) => self.build_rule(&spec),
            Err(e) => RuleOutcome::Skipped(SkipReason::InvalidRule(e.to_string())),
        }
    }

    pub fn build_rule(&self, spec: &RuleSpec) -> RuleOutcome {
        match self.try_build(spec) {
            Ok(rule) => RuleOutcome::Applied(rule),
            Err(reason) => RuleOutcome::Skipped(reason),
        }
    }

    fn try_build(&self, spec: &RuleSpec) -> Result<ConditionalFormatRule, SkipReason> {
        let ranges = parse_ranges(&spec.range)?;
        let formulae = spec.formulae.as_deref().unwrap_or_default();

        let (rule_type, differential) = match spec.rule_type.as_str() {
            "dataBar" => {
                let color = spec
                    .color
                    .as_deref()
                    .unwrap_or(self.config.default_data_bar_color.as_str());
                let color = Color::from_hex(color).ok_or_else(|| {
                    SkipReason::InvalidRule(format!("invalid data bar color '{color}'"))
                })?;
                (ConditionalFormatRule::data_bar(color).rule_type, false)
            }
            "containsText" => (
                CfRuleType::ContainsText {
                    operator: parse_operator(spec.operator.as_deref())?,
                    text: formulae.first().and_then(formula_text),
                },
                true,
            ),
            "" => return Err(SkipReason::InvalidRule("missing rule type".into())),
            kind => {
                let operator = parse_operator(spec.operator.as_deref())?;
                let formulas = clean_numeric_formulae(formulae);
                if formulas.is_empty() {
                    return Err(SkipReason::NoUsableFormulae);
                }
                (
                    CfRuleType::Threshold {
                        kind: kind.to_string(),
                        operator,
                        formulas,
                    },
                    true,
                )
            }
        };

        let mut rule = ConditionalFormatRule::new(rule_type);
        rule.ranges = ranges;
        if differential {
            if let Some(style) = &spec.style {
                let differential = StyleCodec::decode(style)
                    .and_then(|s| StyleCodec::differential_style(&s))
                    .map_err(|e| SkipReason::InvalidRule(format!("style: {e}")))?;
                rule.format = Some(differential);
            }
        }
        Ok(rule)
    }
}

/// Keep the entries of `formulae` that read as finite numbers
///
/// Nulls, blank strings and text that is not a number are dropped.
pub fn clean_numeric_formulae(formulae: &[Value]) -> Vec<f64> {
    formulae
        .iter()
        .filter_map(|f| match f {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|n| n.is_finite())
        .collect()
}

fn formula_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn parse_operator(operator: Option<&str>) -> Result<Option<CfOperator>, SkipReason> {
    operator
        .map(|op| {
            CfOperator::from_xlsx(op)
                .ok_or_else(|| SkipReason::InvalidRule(format!("unknown operator '{op}'")))
        })
        .transpose()
}

/// Space separated ranges, each possibly sheet qualified
fn parse_ranges(reference: &str) -> Result<Vec<CellRange>, SkipReason> {
    let ranges = reference
        .split_whitespace()
        .map(|r| {
            CellRange::parse_unqualified(r)
                .map(|range| range.to_relative())
                .map_err(|e| SkipReason::InvalidRule(format!("ref: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ranges.is_empty() {
        return Err(SkipReason::InvalidRule("empty ref".into()));
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use xlreport_core::conditional_format::CfValueType;

    fn build(value: Value) -> RuleOutcome {
        let config = ReportConfig::default();
        ConditionalFormatCodec::new(&config).build_rule_value(&value)
    }

    fn applied(value: Value) -> ConditionalFormatRule {
        match build(value) {
            RuleOutcome::Applied(rule) => rule,
            RuleOutcome::Skipped(reason) => panic!("rule skipped: {reason}"),
        }
    }

    #[test]
    fn test_numeric_formulae_are_cleaned_one_by_one() {
        let rule = applied(json!({
            "ref": "B2:B10", "type": "cellIs", "operator": "between",
            "formulae": ["10", "abc", null, "  ", 20]
        }));
        assert_eq!(
            rule.rule_type,
            CfRuleType::Threshold {
                kind: "cellIs".into(),
                operator: Some(CfOperator::Between),
                formulas: vec![10.0, 20.0],
            }
        );
        assert_eq!(rule.ranges, vec![CellRange::parse("B2:B10").unwrap()]);
    }

    #[test]
    fn test_rule_without_usable_formulae_is_skipped() {
        assert_eq!(
            build(json!({"ref": "A1:A3", "type": "cellIs", "operator": "equal", "formulae": ["x", ""]})),
            RuleOutcome::Skipped(SkipReason::NoUsableFormulae)
        );
        assert_eq!(
            build(json!({"ref": "A1:A3", "type": "cellIs"})),
            RuleOutcome::Skipped(SkipReason::NoUsableFormulae)
        );
    }

    #[test]
    fn test_data_bar_ignores_formulae_and_operator() {
        let rule = applied(json!({
            "ref": "C2:C9", "type": "dataBar", "operator": "bogus",
            "formulae": ["1", "2"], "style": {"font": {"bold": true}}
        }));
        match rule.rule_type {
            CfRuleType::DataBar {
                min_value,
                max_value,
                color,
            } => {
                assert_eq!(min_value.value_type, CfValueType::Min);
                assert_eq!(max_value.value_type, CfValueType::Max);
                assert_eq!(color, Color::rgb(0x63, 0x8E, 0xC6));
            }
            other => panic!("unexpected rule type {other:?}"),
        }
        assert_eq!(rule.format, None);

        let rule = applied(json!({"ref": "C2:C9", "type": "dataBar", "color": "00B050"}));
        assert!(matches!(
            rule.rule_type,
            CfRuleType::DataBar { color, .. } if color == Color::rgb(0, 0xB0, 0x50)
        ));
    }

    #[test]
    fn test_contains_text_uses_first_formula() {
        let rule = applied(json!({
            "ref": "D2:D20", "type": "containsText", "operator": "containsText",
            "formulae": ["Urgent", "Ignored"],
            "style": {"font": {"color": "9C0006"}, "fill": {"pattern": "solid", "start_color": "FFC7CE"}}
        }));
        assert_eq!(
            rule.rule_type,
            CfRuleType::ContainsText {
                operator: Some(CfOperator::ContainsText),
                text: Some("Urgent".into()),
            }
        );
        let format = rule.format.unwrap();
        assert_eq!(format.font.color, Some(Color::rgb(0x9C, 0, 6)));

        let rule = applied(json!({"ref": "D2:D20", "type": "containsText"}));
        assert_eq!(
            rule.rule_type,
            CfRuleType::ContainsText {
                operator: None,
                text: None,
            }
        );
    }

    #[test]
    fn test_differential_style_drops_border() {
        let rule = applied(json!({
            "ref": "A1:A5", "type": "cellIs", "operator": "lessThan", "formulae": ["0"],
            "style": {"font": {"bold": true}, "border": {"left": {"style": "thin"}}}
        }));
        let format = rule.format.unwrap();
        assert!(format.font.bold);
        assert!(format.border.is_empty());
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        for entry in [
            json!({"type": "cellIs", "formulae": ["1"]}),
            json!({"ref": "A1:A5", "formulae": ["1"]}),
            json!({"ref": "not a range", "type": "cellIs", "formulae": ["1"]}),
            json!({"ref": "A1:A5", "type": "cellIs", "operator": "around", "formulae": ["1"]}),
            json!({"ref": "A1:A5", "type": "dataBar", "color": "blue"}),
            json!({"ref": "A1:A5", "type": "cellIs", "formulae": ["1"], "style": {"font": 3}}),
            json!("cellIs"),
        ] {
            assert!(
                matches!(build(entry.clone()), RuleOutcome::Skipped(SkipReason::InvalidRule(_))),
                "{entry} should be skipped as invalid"
            );
        }
    }

    #[test]
    fn test_qualified_and_multiple_ranges() {
        let rule = applied(json!({
            "ref": "Sheet1!$A$1:$A$3 C1:C3", "type": "cellIs", "operator": "greaterThan", "formulae": [5]
        }));
        assert_eq!(
            rule.ranges,
            vec![
                CellRange::parse("A1:A3").unwrap(),
                CellRange::parse("C1:C3").unwrap()
            ]
        );
    }

    #[test]
    fn test_pass_through_rule_type() {
        let rule = applied(json!({"ref": "A1:A9", "type": "top10", "formulae": ["3"]}));
        assert_eq!(rule.rule_type.xlsx_type(), "top10");
    }
}
