//! Chart entries to chart objects
//!
//! Ranges may carry a `Sheet!` prefix; it is dropped and the references are
//! re-qualified with the sheet the chart is added to. Each column of
//! `data_range` becomes one series.

use serde::Deserialize;
use serde_json::Value;

use crate::config::ReportConfig;
use crate::document::ChartSpec;
use crate::outcome::{ChartOutcome, SkipReason};
use xlreport_chart::{
    BarDirection, Chart, ChartAnchor, ChartType, DataReference, DataSeries, SeriesName,
};
use xlreport_core::cell::split_sheet_qualifier;
use xlreport_core::{CellAddress, CellRange};

/// Builds charts from [`ChartSpec`]s for one sheet
pub struct ChartCodec<'a> {
    config: &'a ReportConfig,
    sheet_name: &'a str,
}

impl<'a> ChartCodec<'a> {
    pub fn new(config: &'a ReportConfig, sheet_name: &'a str) -> Self {
        Self { config, sheet_name }
    }

    /// Decode a raw JSON entry, then build it
    pub fn build_chart_value(&self, value: &Value) -> ChartOutcome {
        match ChartSpec::deserialize(value) {
            Ok(spec) => self.build_chart(&spec),
            Err(e) => ChartOutcome::Skipped(SkipReason::InvalidChart(e.to_string())),
        }
    }

    pub fn build_chart(&self, spec: &ChartSpec) -> ChartOutcome {
        match self.try_build(spec) {
            Ok(chart) => ChartOutcome::Added(chart),
            Err(reason) => ChartOutcome::Skipped(reason),
        }
    }

    fn try_build(&self, spec: &ChartSpec) -> Result<Chart, SkipReason> {
        let chart_type = chart_type(spec.chart_type.as_deref().unwrap_or("bar"))?;

        let data = spec
            .data_range
            .as_deref()
            .ok_or_else(|| SkipReason::InvalidChart("missing data_range".into()))?;
        let data = parse_range("data_range", data)?;
        let categories = spec
            .category_range
            .as_deref()
            .map(|r| parse_range("category_range", r))
            .transpose()?
            .map(|range| DataReference::new(self.sheet_name, range));

        let position = spec
            .position
            .as_deref()
            .unwrap_or(self.config.default_chart_position.as_str());
        let (_, local) = split_sheet_qualifier(position);
        let anchor = CellAddress::parse(local)
            .map(CellAddress::to_relative)
            .map_err(|e| SkipReason::InvalidChart(format!("position: {e}")))?;

        let mut chart = Chart::new(chart_type).with_anchor(ChartAnchor::at(anchor));
        chart.title = spec
            .title
            .clone()
            .or_else(|| self.config.default_chart_title.clone());
        chart.style = spec.style.unwrap_or(self.config.default_chart_style);
        if chart_type.has_axes() {
            chart.category_axis.title = spec.x_axis_title.clone();
            chart.value_axis.title = spec.y_axis_title.clone();
        }

        for series in self.series(&data, spec.titles_from_data) {
            let series = match &categories {
                Some(categories) => series.with_categories(categories.clone()),
                None => series,
            };
            chart.add_series(series);
        }

        Ok(chart)
    }

    /// One series per column; with titles from data the first row names it
    fn series(&self, data: &CellRange, titles_from_data: bool) -> Vec<DataSeries> {
        let with_titles = titles_from_data && data.row_count() > 1;
        let first_value_row = data.start.row + u32::from(with_titles);

        (data.start.col..=data.end.col)
            .filter_map(|col| {
                let values = data.column_slice(col, first_value_row)?;
                let series = DataSeries::new(DataReference::new(self.sheet_name, values));
                Some(if with_titles {
                    let title = CellRange::single(CellAddress::new(data.start.row, col));
                    series.with_name(SeriesName::Reference(DataReference::new(
                        self.sheet_name,
                        title,
                    )))
                } else {
                    series
                })
            })
            .collect()
    }
}

fn chart_type(kind: &str) -> Result<ChartType, SkipReason> {
    match kind.to_ascii_lowercase().as_str() {
        "bar" => Ok(ChartType::Bar(BarDirection::Bar)),
        "col" | "column" => Ok(ChartType::Bar(BarDirection::Column)),
        "line" => Ok(ChartType::Line),
        "pie" => Ok(ChartType::Pie),
        _ => Err(SkipReason::UnsupportedChartType(kind.to_string())),
    }
}

fn parse_range(field: &str, reference: &str) -> Result<CellRange, SkipReason> {
    CellRange::parse_unqualified(reference)
        .map(|range| range.to_relative())
        .map_err(|e| SkipReason::InvalidChart(format!("{field}: {e}")))
}
