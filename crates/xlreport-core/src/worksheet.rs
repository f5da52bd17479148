//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellAddress, CellData, CellRange, CellStorage, CellValue};
use crate::conditional_format::ConditionalFormatRule;
use crate::error::{Error, Result};
use crate::style::Style;
use crate::{MAX_COLS, MAX_ROWS};

/// A single worksheet (tab) in a workbook
#[derive(Debug)]
pub struct Worksheet {
    name: String,
    cells: CellStorage,
    conditional_formats: Vec<ConditionalFormatRule>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
            conditional_formats: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell Access ===

    /// Get a cell by address string (e.g., "A1")
    pub fn cell(&self, address: &str) -> Result<Option<&CellData>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(addr.row, addr.col))
    }

    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(row, col)
    }

    /// Get cell value (convenience method)
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr = CellAddress::parse(address)?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(row, col)
            .map(|c| c.value.clone())
            .unwrap_or_default()
    }

    /// Style index of a cell, 0 when the cell is absent or unstyled
    pub fn cell_style_index_at(&self, row: u32, col: u16) -> u32 {
        self.cells.get(row, col).map_or(0, |c| c.style_index)
    }

    /// Get a style by its index in this worksheet's style pool
    pub fn style_by_index(&self, style_index: u32) -> Option<&Style> {
        self.cells.style_pool().get(style_index)
    }

    /// The explicit style of a cell, `None` when it has the default style
    pub fn cell_style_at(&self, row: u32, col: u16) -> Option<&Style> {
        match self.cell_style_index_at(row, col) {
            0 => None,
            idx => self.style_by_index(idx),
        }
    }

    /// Get the non-default style applied to a cell by address, if any
    pub fn cell_style(&self, address: &str) -> Result<Option<&Style>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_style_at(addr.row, addr.col))
    }

    // === Cell Modification ===

    /// Set a cell value by address string
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells.set_value(row, col, value.into());
        Ok(())
    }

    /// Set a cell style by address string
    pub fn set_cell_style(&mut self, address: &str, style: &Style) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.set_cell_style_at(addr.row, addr.col, style)
    }

    /// Set a cell style; an identical style already in the pool is reused
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let style_index = self.cells.style_pool_mut().get_or_insert(style.clone());
        self.cells.set_style(row, col, style_index);
        Ok(())
    }

    // === Range Operations ===

    /// Bounds of all stored cells and merged regions
    pub fn used_range(&self) -> Option<CellRange> {
        let cells = self
            .cells
            .used_bounds()
            .map(|(r0, c0, r1, c1)| CellRange::from_indices(r0, c0, r1, c1));

        self.merged_regions()
            .iter()
            .copied()
            .chain(cells)
            .reduce(|acc, r| {
                CellRange::from_indices(
                    acc.start.row.min(r.start.row),
                    acc.start.col.min(r.start.col),
                    acc.end.row.max(r.end.row),
                    acc.end.col.max(r.end.col),
                )
            })
    }

    /// The rectangle from `A1` to the bottom-right corner of [`used_range`]
    ///
    /// [`used_range`]: Worksheet::used_range
    pub fn dimension(&self) -> Option<CellRange> {
        self.used_range()
            .map(|r| CellRange::from_indices(0, 0, r.end.row, r.end.col))
    }

    // === Column Widths ===

    /// Custom width of a column in characters, if one was set
    pub fn column_width(&self, col: u16) -> Option<f64> {
        self.cells.column_width(col)
    }

    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.cells.set_column_width(col, width);
    }

    pub fn column_widths(&self) -> &BTreeMap<u16, f64> {
        self.cells.column_widths()
    }

    // === Merged Cells ===

    pub fn merged_regions(&self) -> &[CellRange] {
        self.cells.merged_regions()
    }

    /// Merge a range
    ///
    /// Every cell other than the top-left anchor is cleared. A range that
    /// overlaps an existing merged region is rejected. `$` markers are not kept.
    pub fn merge_cells(&mut self, range: &CellRange) -> Result<()> {
        let range = &range.to_relative();
        if let Some(existing) = self
            .cells
            .merged_regions()
            .iter()
            .find(|existing| range.overlaps(existing))
        {
            return Err(Error::MergedCellConflict(format!(
                "{range} (conflicts with {existing})"
            )));
        }
        self.validate_cell_position(range.end.row, range.end.col)?;

        for addr in range.cells() {
            if !range.is_anchor(addr.row, addr.col) {
                self.cells.remove(addr.row, addr.col);
            }
        }
        self.cells.push_merged_region(*range);
        Ok(())
    }

    /// The merged region containing a cell, if any
    pub fn merged_region_at(&self, row: u32, col: u16) -> Option<&CellRange> {
        self.cells.merged_region_at(row, col)
    }

    /// True for a cell inside a merged region that is not its anchor
    pub fn is_merge_member(&self, row: u32, col: u16) -> bool {
        self.merged_region_at(row, col)
            .is_some_and(|r| !r.is_anchor(row, col))
    }

    // === Conditional Formatting ===

    /// Add a conditional formatting rule
    ///
    /// Rules without an explicit priority are ranked after every rule
    /// already on the sheet.
    pub fn add_conditional_format(&mut self, mut rule: ConditionalFormatRule) {
        for range in &mut rule.ranges {
            *range = range.to_relative();
        }
        if rule.priority == 0 {
            rule.priority = self.conditional_formats.len() as u32 + 1;
        }
        self.conditional_formats.push(rule);
    }

    pub fn conditional_formats(&self) -> &[ConditionalFormatRule] {
        &self.conditional_formats
    }

    /// Rules that apply to a specific cell
    pub fn conditional_formats_at(&self, row: u32, col: u16) -> Vec<&ConditionalFormatRule> {
        self.conditional_formats
            .iter()
            .filter(|rule| rule.applies_to(row, col))
            .collect()
    }

    // === Iteration ===

    /// Number of stored cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over stored cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter()
    }

    /// The worksheet's style pool
    pub fn style_pool(&self) -> &crate::style::StylePool {
        self.cells.style_pool()
    }

    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(())
    }
}
