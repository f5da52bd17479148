//! Charts grouped by the worksheet that hosts them

use std::collections::BTreeMap;

use crate::chart::Chart;

/// Charts of a workbook, keyed by worksheet index
///
/// Charts on the same sheet keep insertion order.
#[derive(Debug, Clone, Default)]
pub struct Charts {
    by_sheet: BTreeMap<usize, Vec<Chart>>,
}

impl Charts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sheet_index: usize, chart: Chart) {
        self.by_sheet.entry(sheet_index).or_default().push(chart);
    }

    /// Charts hosted by a sheet, empty when it has none
    pub fn for_sheet(&self, sheet_index: usize) -> &[Chart] {
        self.by_sheet
            .get(&sheet_index)
            .map_or(&[], |charts| charts.as_slice())
    }

    /// Sheets with at least one chart, with their charts, in sheet order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[Chart])> {
        self.by_sheet
            .iter()
            .filter(|(_, charts)| !charts.is_empty())
            .map(|(&i, charts)| (i, charts.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_sheet.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
