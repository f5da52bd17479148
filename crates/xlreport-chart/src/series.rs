//! Data series types

use xlreport_core::cell::quote_sheet_name;
use xlreport_core::CellRange;

/// Data series for a chart
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    pub name: Option<SeriesName>,
    /// Values (Y data)
    pub values: DataReference,
    /// Categories (X data)
    pub categories: Option<DataReference>,
}

impl DataSeries {
    pub fn new(values: DataReference) -> Self {
        Self {
            name: None,
            values,
            categories: None,
        }
    }

    pub fn with_name(mut self, name: SeriesName) -> Self {
        self.name = Some(name);
        self
    }

    pub fn with_categories(mut self, categories: DataReference) -> Self {
        self.categories = Some(categories);
        self
    }
}

/// Where a series takes its title from
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesName {
    Literal(String),
    /// Title read from a worksheet cell
    Reference(DataReference),
}

/// A range on a named worksheet that feeds a chart
#[derive(Debug, Clone, PartialEq)]
pub struct DataReference {
    pub sheet: String,
    pub range: CellRange,
}

impl DataReference {
    pub fn new<S: Into<String>>(sheet: S, range: CellRange) -> Self {
        Self {
            sheet: sheet.into(),
            range,
        }
    }

    /// Fully qualified absolute reference, e.g. `'Q1 Data'!$A$1:$A$5`
    ///
    /// ```
    /// use xlreport_chart::DataReference;
    /// use xlreport_core::CellRange;
    ///
    /// let r = DataReference::new("Sheet1", CellRange::parse("B2:B5").unwrap());
    /// assert_eq!(r.formula(), "Sheet1!$B$2:$B$5");
    /// ```
    pub fn formula(&self) -> String {
        format!(
            "{}!{}",
            quote_sheet_name(&self.sheet),
            self.range.to_absolute_string()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_formula_quotes_sheet_names_with_spaces() {
        let r = DataReference::new("Reporte Generado", CellRange::parse("A2:A5").unwrap());
        assert_eq!(r.formula(), "'Reporte Generado'!$A$2:$A$5");
    }
}
