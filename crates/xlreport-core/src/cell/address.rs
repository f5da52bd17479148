//! Cell address and range types

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// Rows and columns are stored 0-based; the A1 form is 1-based. A `$`
/// prefix marks the column or row part as absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// Row index (0-based)
    pub row: u32,
    /// Column index (0-based, A=0)
    pub col: u16,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a relative cell address
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create an absolute cell address ($A$1 style)
    pub fn absolute(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: true,
            col_absolute: true,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use xlreport_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("$C$7").unwrap();
    /// assert_eq!((addr.row, addr.col), (6, 2));
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let (col_absolute, rest) = match text.strip_prefix('$') {
            Some(rest) => (true, rest),
            None => (false, text),
        };

        let letters_end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        if letters_end == 0 {
            return Err(Error::InvalidAddress(format!("no column letters in '{text}'")));
        }
        let col = Self::letters_to_column(&rest[..letters_end])?;

        let (row_absolute, digits) = match rest[letters_end..].strip_prefix('$') {
            Some(digits) => (true, digits),
            None => (false, &rest[letters_end..]),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!("invalid row number in '{text}'")));
        }

        let row_1based: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{text}'")))?;
        if row_1based == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{text}'"
            )));
        }
        let row = row_1based - 1;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self {
            row,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Convert column index to letters (0 = A, 26 = AA)
    pub fn column_to_letters(col: u16) -> String {
        let mut letters = Vec::with_capacity(3);
        let mut n = u32::from(col) + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.iter().rev().map(|&b| b as char).collect()
    }

    /// Convert column letters to index (A = 0, AA = 26), case-insensitive
    pub fn letters_to_column(letters: &str) -> Result<u16> {
        if letters.is_empty() {
            return Err(Error::InvalidAddress("empty column letters".into()));
        }

        let mut value: u32 = 0;
        for c in letters.chars() {
            if !c.is_ascii_alphabetic() {
                return Err(Error::InvalidAddress(format!("invalid column letter '{c}'")));
            }
            value = value * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
            if value > u32::from(MAX_COLS) {
                return Err(Error::ColumnOutOfBounds(
                    value.min(u32::from(u16::MAX)) as u16 - 1,
                    MAX_COLS - 1,
                ));
            }
        }

        Ok((value - 1) as u16)
    }

    /// Format as A1-style string, keeping `$` markers
    pub fn to_a1_string(&self) -> String {
        format!(
            "{}{}{}{}",
            if self.col_absolute { "$" } else { "" },
            Self::column_to_letters(self.col),
            if self.row_absolute { "$" } else { "" },
            self.row + 1
        )
    }

    /// Same cell, both parts absolute
    pub fn to_absolute(self) -> Self {
        Self::absolute(self.row, self.col)
    }

    /// Same cell without `$` markers
    pub fn to_relative(self) -> Self {
        Self::new(self.row, self.col)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Split a reference like `Sheet1!A1:B2` or `'My Sheet'!A1` into its sheet
/// qualifier (quotes removed) and the local part.
///
/// ```
/// use xlreport_core::cell::split_sheet_qualifier;
///
/// assert_eq!(split_sheet_qualifier("Sheet1!B2:D2"), (Some("Sheet1"), "B2:D2"));
/// assert_eq!(split_sheet_qualifier("'Q1 Data'!A1"), (Some("Q1 Data"), "A1"));
/// assert_eq!(split_sheet_qualifier("A1:A5"), (None, "A1:A5"));
/// ```
pub fn split_sheet_qualifier(reference: &str) -> (Option<&str>, &str) {
    let reference = reference.trim();
    match reference.rfind('!') {
        Some(bang) => {
            let sheet = &reference[..bang];
            let sheet = sheet
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .unwrap_or(sheet);
            (Some(sheet), &reference[bang + 1..])
        }
        None => (None, reference),
    }
}

/// Quote a sheet name for use in a qualified reference when it needs it
pub fn quote_sheet_name(name: &str) -> String {
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    let starts_with_digit = name.chars().next().is_some_and(|c| c.is_ascii_digit());
    if plain && !starts_with_digit {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

/// A rectangular range of cells (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Top-left corner
    pub start: CellAddress,
    /// Bottom-right corner
    pub end: CellAddress,
}

impl CellRange {
    /// Create a range from two corners in any order
    pub fn new(a: CellAddress, b: CellAddress) -> Self {
        let (top, bottom) = if a.row <= b.row { (a, b) } else { (b, a) };
        let mut start = CellAddress::new(top.row, a.col.min(b.col));
        let mut end = CellAddress::new(bottom.row, a.col.max(b.col));
        start.row_absolute = top.row_absolute;
        end.row_absolute = bottom.row_absolute;
        start.col_absolute = if a.col <= b.col { a.col_absolute } else { b.col_absolute };
        end.col_absolute = if a.col <= b.col { b.col_absolute } else { a.col_absolute };
        Self { start, end }
    }

    /// Create a range from 0-based row/column indices
    pub fn from_indices(start_row: u32, start_col: u16, end_row: u32, end_col: u16) -> Self {
        Self::new(
            CellAddress::new(start_row, start_col),
            CellAddress::new(end_row, end_col),
        )
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Parse an unqualified `A1:B10` or `A1` reference
    pub fn parse(s: &str) -> Result<Self> {
        let text = s.trim();
        if text.contains('!') {
            return Err(Error::InvalidRange(format!(
                "sheet-qualified reference '{text}' where a local range was expected"
            )));
        }
        match text.split_once(':') {
            Some((a, b)) => {
                let start = CellAddress::parse(a)
                    .map_err(|e| Error::InvalidRange(format!("'{text}': {e}")))?;
                let end = CellAddress::parse(b)
                    .map_err(|e| Error::InvalidRange(format!("'{text}': {e}")))?;
                Ok(Self::new(start, end))
            }
            None => CellAddress::parse(text)
                .map(Self::single)
                .map_err(|e| Error::InvalidRange(format!("'{text}': {e}"))),
        }
    }

    /// Parse a range, discarding any `Sheet!` qualifier
    pub fn parse_unqualified(s: &str) -> Result<Self> {
        let (_, local) = split_sheet_qualifier(s);
        Self::parse(local)
    }

    /// Check if a cell is within this range
    pub fn contains(&self, row: u32, col: u16) -> bool {
        (self.start.row..=self.end.row).contains(&row)
            && (self.start.col..=self.end.col).contains(&col)
    }

    /// Whether `(row, col)` is the top-left cell of the range
    pub fn is_anchor(&self, row: u32, col: u16) -> bool {
        self.start.row == row && self.start.col == col
    }

    pub fn row_count(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn col_count(&self) -> u16 {
        self.end.col - self.start.col + 1
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.start.row <= other.end.row
            && other.start.row <= self.end.row
            && self.start.col <= other.end.col
            && other.start.col <= self.end.col
    }

    /// Iterate over all cell addresses in the range, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> {
        let (start, end) = (self.start, self.end);
        (start.row..=end.row)
            .flat_map(move |row| (start.col..=end.col).map(move |col| CellAddress::new(row, col)))
    }

    /// Format as `A1:B10`, or `A1` for a single cell
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start, self.end)
        }
    }

    /// Same range without `$` markers
    pub fn to_relative(&self) -> Self {
        Self {
            start: self.start.to_relative(),
            end: self.end.to_relative(),
        }
    }

    /// Format as `$A$1:$B$10`, the form chart references use
    pub fn to_absolute_string(&self) -> String {
        Self {
            start: self.start.to_absolute(),
            end: self.end.to_absolute(),
        }
        .to_a1_string()
    }

    /// Single-column slice `col` of this range, limited to rows `first_row..=end`
    pub fn column_slice(&self, col: u16, first_row: u32) -> Option<CellRange> {
        if !(self.start.col..=self.end.col).contains(&col) || first_row > self.end.row {
            return None;
        }
        Some(CellRange::from_indices(
            first_row.max(self.start.row),
            col,
            self.end.row,
            col,
        ))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
