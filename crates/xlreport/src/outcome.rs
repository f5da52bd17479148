//! Outcomes of the best-effort steps of a build
//!
//! Conditional rules and charts that cannot be built are skipped. The build
//! carries on and reports them as [`BuildWarning`]s.

use std::fmt;

use xlreport_chart::Chart;
use xlreport_core::ConditionalFormatRule;

/// Why a conditional rule or chart entry was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A numeric rule kept no threshold after cleaning its `formulae`
    NoUsableFormulae,
    InvalidRule(String),
    UnsupportedChartType(String),
    InvalidChart(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoUsableFormulae => f.write_str("no numeric formulae left after cleaning"),
            SkipReason::InvalidRule(reason) => write!(f, "invalid rule: {reason}"),
            SkipReason::UnsupportedChartType(kind) => write!(f, "unsupported chart type '{kind}'"),
            SkipReason::InvalidChart(reason) => write!(f, "invalid chart: {reason}"),
        }
    }
}

/// Result of building one conditional formatting entry
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    Applied(ConditionalFormatRule),
    Skipped(SkipReason),
}

/// Result of building one chart entry
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    Added(Chart),
    Skipped(SkipReason),
}

/// Which list of the document a warning refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSource {
    ConditionalRule,
    Chart,
}

impl WarningSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningSource::ConditionalRule => "conditional formatting rule",
            WarningSource::Chart => "chart",
        }
    }
}

/// A skipped entry, identified by its position in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWarning {
    pub kind: WarningSource,
    pub index: usize,
    pub reason: SkipReason,
}

impl BuildWarning {
    pub fn new(kind: WarningSource, index: usize, reason: SkipReason) -> Self {
        Self {
            kind,
            index,
            reason,
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} skipped: {}", self.kind.as_str(), self.index, self.reason)
    }
}

/// Output of a successful build
#[derive(Debug, Clone)]
pub struct BuiltReport {
    /// The serialized workbook
    pub bytes: Vec<u8>,
    pub warnings: Vec<BuildWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let warning = BuildWarning::new(
            WarningSource::Chart,
            2,
            SkipReason::UnsupportedChartType("radar".into()),
        );
        assert_eq!(
            warning.to_string(),
            "chart #2 skipped: unsupported chart type 'radar'"
        );
    }
}
