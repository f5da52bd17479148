//! Legend types

/// Chart legend
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Legend {
    pub position: LegendPosition,
    /// Whether legend overlays the plot area
    pub overlay: bool,
}

impl Legend {
    pub fn new(position: LegendPosition) -> Self {
        Self {
            position,
            overlay: false,
        }
    }
}

/// Legend position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    Right,
    Top,
    Bottom,
    Left,
    TopRight,
}

impl LegendPosition {
    /// The `legendPos` value used in DrawingML
    pub fn as_str(&self) -> &'static str {
        match self {
            LegendPosition::Right => "r",
            LegendPosition::Top => "t",
            LegendPosition::Bottom => "b",
            LegendPosition::Left => "l",
            LegendPosition::TopRight => "tr",
        }
    }
}
