//! Chart types

use xlreport_core::CellAddress;

use crate::axis::{Axis, AxisPosition};
use crate::legend::{Legend, LegendPosition};
use crate::series::DataSeries;

/// Chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    /// Bar chart; the direction decides columns or horizontal bars
    Bar(BarDirection),
    Line,
    Pie,
}

impl ChartType {
    /// Pie charts have no axes
    pub fn has_axes(&self) -> bool {
        !matches!(self, ChartType::Pie)
    }
}

/// Orientation of a bar chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarDirection {
    /// Vertical columns
    #[default]
    Column,
    /// Horizontal bars
    Bar,
}

impl BarDirection {
    /// The `barDir` value used in DrawingML
    pub fn as_str(&self) -> &'static str {
        match self {
            BarDirection::Column => "col",
            BarDirection::Bar => "bar",
        }
    }
}

/// Chart definition
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub chart_type: ChartType,
    pub title: Option<String>,
    /// Built-in chart style id (1-48)
    pub style: u8,
    pub series: Vec<DataSeries>,
    /// Category axis (X)
    pub category_axis: Axis,
    /// Value axis (Y)
    pub value_axis: Axis,
    pub legend: Option<Legend>,
    pub anchor: ChartAnchor,
}

impl Chart {
    /// Style applied when none is requested
    pub const DEFAULT_STYLE: u8 = 10;

    pub fn new(chart_type: ChartType) -> Self {
        let (category_pos, value_pos) = match chart_type {
            ChartType::Bar(BarDirection::Bar) => (AxisPosition::Left, AxisPosition::Bottom),
            _ => (AxisPosition::Bottom, AxisPosition::Left),
        };
        Self {
            chart_type,
            title: None,
            style: Self::DEFAULT_STYLE,
            series: Vec::new(),
            category_axis: Axis::new(category_pos),
            value_axis: Axis::new(value_pos),
            legend: Some(Legend::new(LegendPosition::Right)),
            anchor: ChartAnchor::default(),
        }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_anchor(mut self, anchor: ChartAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn add_series(&mut self, series: DataSeries) {
        self.series.push(series);
    }
}

/// One-cell anchor: the chart's top-left corner sits on `from`, its size is
/// fixed in EMU (914400 per inch)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartAnchor {
    pub from: CellAddress,
    pub width_emu: u64,
    pub height_emu: u64,
}

impl ChartAnchor {
    /// 15 cm
    pub const DEFAULT_WIDTH_EMU: u64 = 5_400_000;
    /// 7.5 cm
    pub const DEFAULT_HEIGHT_EMU: u64 = 2_700_000;

    pub fn at(from: CellAddress) -> Self {
        Self {
            from,
            width_emu: Self::DEFAULT_WIDTH_EMU,
            height_emu: Self::DEFAULT_HEIGHT_EMU,
        }
    }
}

impl Default for ChartAnchor {
    /// Anchored at `E1`
    fn default() -> Self {
        Self::at(CellAddress::new(0, 4))
    }
}
