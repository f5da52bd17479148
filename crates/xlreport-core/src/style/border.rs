//! Border style types

use super::Color;

/// The four independent sides of a cell border
///
/// A side left as `None` draws nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    pub left: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

impl BorderStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same edge on every side
    pub fn all(edge: BorderEdge) -> Self {
        Self {
            left: Some(edge),
            right: Some(edge),
            top: Some(edge),
            bottom: Some(edge),
        }
    }

    /// Sides in `left, right, top, bottom` order, named as in SpreadsheetML
    pub fn sides(&self) -> [(&'static str, Option<&BorderEdge>); 4] {
        [
            ("left", self.left.as_ref()),
            ("right", self.right.as_ref()),
            ("top", self.top.as_ref()),
            ("bottom", self.bottom.as_ref()),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.sides().iter().all(|(_, edge)| edge.is_none())
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    pub style: BorderLineStyle,
    /// Line color; `None` leaves it to the application (usually black)
    pub color: Option<Color>,
}

impl BorderEdge {
    pub fn new(style: BorderLineStyle, color: Option<Color>) -> Self {
        Self { style, color }
    }

    /// Thin line with automatic color
    pub fn thin() -> Self {
        Self::new(BorderLineStyle::Thin, None)
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    /// Hair line (very thin)
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderLineStyle {
    /// The `style` keyword used in SpreadsheetML
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderLineStyle::None => "none",
            BorderLineStyle::Thin => "thin",
            BorderLineStyle::Medium => "medium",
            BorderLineStyle::Thick => "thick",
            BorderLineStyle::Dashed => "dashed",
            BorderLineStyle::Dotted => "dotted",
            BorderLineStyle::Double => "double",
            BorderLineStyle::Hair => "hair",
            BorderLineStyle::MediumDashed => "mediumDashed",
            BorderLineStyle::DashDot => "dashDot",
            BorderLineStyle::MediumDashDot => "mediumDashDot",
            BorderLineStyle::DashDotDot => "dashDotDot",
            BorderLineStyle::MediumDashDotDot => "mediumDashDotDot",
            BorderLineStyle::SlantDashDot => "slantDashDot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "none" => BorderLineStyle::None,
            "thin" => BorderLineStyle::Thin,
            "medium" => BorderLineStyle::Medium,
            "thick" => BorderLineStyle::Thick,
            "dashed" => BorderLineStyle::Dashed,
            "dotted" => BorderLineStyle::Dotted,
            "double" => BorderLineStyle::Double,
            "hair" => BorderLineStyle::Hair,
            "mediumDashed" => BorderLineStyle::MediumDashed,
            "dashDot" => BorderLineStyle::DashDot,
            "mediumDashDot" => BorderLineStyle::MediumDashDot,
            "dashDotDot" => BorderLineStyle::DashDotDot,
            "mediumDashDotDot" => BorderLineStyle::MediumDashDotDot,
            "slantDashDot" => BorderLineStyle::SlantDashDot,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_order() {
        let border = BorderStyle {
            top: Some(BorderEdge::thin()),
            ..Default::default()
        };
        let names: Vec<_> = border
            .sides()
            .iter()
            .filter(|(_, e)| e.is_some())
            .map(|(n, _)| *n)
            .collect();
        assert_eq!(names, vec!["top"]);
        assert!(!border.is_empty());
        assert!(BorderStyle::new().is_empty());
    }

    #[test]
    fn test_line_style_keywords() {
        assert_eq!(BorderLineStyle::parse("mediumDashDot"), Some(BorderLineStyle::MediumDashDot));
        assert_eq!(BorderLineStyle::Hair.as_str(), "hair");
        assert_eq!(BorderLineStyle::parse("THIN"), None);
    }
}
