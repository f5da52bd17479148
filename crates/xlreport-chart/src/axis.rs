//! Axis types

/// Chart axis
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Axis {
    pub title: Option<String>,
    pub position: AxisPosition,
}

impl Axis {
    pub fn new(position: AxisPosition) -> Self {
        Self {
            title: None,
            position,
        }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Axis position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisPosition {
    #[default]
    Bottom,
    Top,
    Left,
    Right,
}

impl AxisPosition {
    /// The `axPos` value used in DrawingML
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisPosition::Bottom => "b",
            AxisPosition::Top => "t",
            AxisPosition::Left => "l",
            AxisPosition::Right => "r",
        }
    }
}
