//! Report configuration

use serde::{Deserialize, Serialize};

/// Settings shared by every build request of a [`ReportService`](crate::ReportService)
///
/// Missing fields in a configuration file take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Title of the generated sheet
    pub sheet_title: String,
    /// Upper bound of a computed column width
    pub max_column_width: f64,
    /// Added to the longest value length of a column
    pub column_padding: f64,
    /// Title for charts that do not name one; `None` leaves them untitled
    pub default_chart_title: Option<String>,
    pub default_chart_style: u8,
    /// Anchor cell for charts without a `position`
    pub default_chart_position: String,
    /// Data bar color (RGB hex) for rules without a `color`
    pub default_data_bar_color: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            sheet_title: "Reporte Generado".to_string(),
            max_column_width: 50.0,
            column_padding: 2.0,
            default_chart_title: Some("Gráfico sin Título".to_string()),
            default_chart_style: 10,
            default_chart_position: "E1".to_string(),
            default_data_bar_color: "638EC6".to_string(),
        }
    }
}

impl ReportConfig {
    /// Load a configuration from JSON text
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Width of a column whose longest value has `max_len` characters
    pub fn column_width(&self, max_len: usize) -> f64 {
        (max_len as f64 + self.column_padding).min(self.max_column_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_takes_defaults() {
        let config = ReportConfig::from_json(r#"{"sheet_title": "Ventas", "max_column_width": 30}"#)
            .unwrap();
        assert_eq!(config.sheet_title, "Ventas");
        assert_eq!(config.max_column_width, 30.0);
        assert_eq!(config.column_padding, 2.0);
        assert_eq!(config.default_chart_position, "E1");
    }

    #[test]
    fn test_column_width_is_padded_and_clamped() {
        let config = ReportConfig::default();
        assert_eq!(config.column_width(0), 2.0);
        assert_eq!(config.column_width(3), 5.0);
        assert_eq!(config.column_width(48), 50.0);
        assert_eq!(config.column_width(60), 50.0);
    }

    #[test]
    fn test_untitled_charts_can_be_configured() {
        let config = ReportConfig::from_json(r#"{"default_chart_title": null}"#).unwrap();
        assert_eq!(config.default_chart_title, None);
    }
}
