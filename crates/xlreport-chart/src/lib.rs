//! # xlreport-chart
//!
//! Chart model for xlreport: bar/column, line and pie charts whose series
//! refer to worksheet ranges, anchored at a cell.

mod axis;
mod chart;
mod collection;
mod legend;
mod series;

pub use axis::{Axis, AxisPosition};
pub use chart::{BarDirection, Chart, ChartAnchor, ChartType};
pub use collection::Charts;
pub use legend::{Legend, LegendPosition};
pub use series::{DataReference, DataSeries, SeriesName};
