//! Font style types

use super::Color;

/// Font style settings
///
/// `name`, `size` and `color` stay `None` until something sets them, so a
/// font built from a partial description only carries what was asked for.
/// Writers fall back to the workbook default font for absent attributes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontStyle {
    /// Font family name (e.g., "Calibri", "Arial")
    pub name: Option<String>,
    /// Font size in points
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Option<Color>,
}

impl FontStyle {
    /// Name of the workbook default font
    pub const DEFAULT_NAME: &'static str = "Calibri";
    /// Size of the workbook default font
    pub const DEFAULT_SIZE: f64 = 11.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    pub fn with_underline(mut self, underline: Underline) -> Self {
        self.underline = underline;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// True when no attribute differs from "not set"
    pub fn is_unset(&self) -> bool {
        *self == FontStyle::default()
    }
}

impl std::hash::Hash for FontStyle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.map(f64::to_bits).hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikethrough.hash(state);
        self.color.hash(state);
    }
}

impl Eq for FontStyle {}

/// Underline style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    /// Single accounting underline (extends to cell width)
    SingleAccounting,
    DoubleAccounting,
}

impl Underline {
    /// The `val` attribute used in SpreadsheetML (`None` has no attribute)
    pub fn as_str(&self) -> &'static str {
        match self {
            Underline::None => "none",
            Underline::Single => "single",
            Underline::Double => "double",
            Underline::SingleAccounting => "singleAccounting",
            Underline::DoubleAccounting => "doubleAccounting",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "none" => Underline::None,
            "single" => Underline::Single,
            "double" => Underline::Double,
            "singleAccounting" => Underline::SingleAccounting,
            "doubleAccounting" => Underline::DoubleAccounting,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_font_is_not_unset() {
        assert!(FontStyle::new().is_unset());
        assert!(!FontStyle::new().with_bold(true).is_unset());
        assert_eq!(FontStyle::new().with_size(14.0).name, None);
    }

    #[test]
    fn test_underline_keywords() {
        for u in [
            Underline::None,
            Underline::Single,
            Underline::Double,
            Underline::SingleAccounting,
            Underline::DoubleAccounting,
        ] {
            assert_eq!(Underline::parse(u.as_str()), Some(u));
        }
        assert_eq!(Underline::parse("wavy"), None);
    }
}
