use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{ChartMargins, Color, MetricFields, ValueFormat, Viewport};
use crate::error::{ChartError, ChartResult};

/// Trailing days treated as provisional because of reporting lag.
pub const DEFAULT_TRUNCATION_DAYS: u32 = 7;
pub const DEFAULT_CHART_WIDTH: u32 = 800;
pub const DEFAULT_CHART_HEIGHT: u32 = 400;

/// Visual parameters handed through to render primitives.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub series_color: Color,
    pub series_line_width: f64,
    /// Dash pattern of the provisional (projected) segment.
    pub projected_dash_px: f64,
    pub projected_gap_px: f64,
    pub confidence_band_color: Color,
    /// Alpha applied to zone colors when filling region bands.
    pub region_fill_alpha: f64,
    pub grid_color: Color,
    pub grid_line_width: f64,
    pub grid_dash_px: f64,
    pub grid_gap_px: f64,
    pub axis_color: Color,
    pub annotation_color: Color,
    pub annotation_background: Color,
    pub inactive_label_background: Color,
    pub active_label_text_color: Color,
    pub font_size_px: f64,
    pub annotation_padding_px: f64,
    pub annotation_corner_radius_px: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            series_color: Color::rgb(0.0, 0.0, 0.0),
            series_line_width: 4.0,
            projected_dash_px: 1.0,
            projected_gap_px: 6.0,
            confidence_band_color: Color::rgb8(0xee, 0xee, 0xee),
            region_fill_alpha: 0.2,
            grid_color: Color::rgba(0.0, 0.0, 0.0, 0.6),
            grid_line_width: 1.0,
            grid_dash_px: 4.0,
            grid_gap_px: 3.0,
            axis_color: Color::rgb8(0x66, 0x66, 0x66),
            annotation_color: Color::rgb8(0x33, 0x33, 0x33),
            annotation_background: Color::rgb(1.0, 1.0, 1.0),
            inactive_label_background: Color::rgb(1.0, 1.0, 1.0),
            active_label_text_color: Color::rgb(1.0, 1.0, 1.0),
            font_size_px: 13.0,
            annotation_padding_px: 4.0,
            annotation_corner_radius_px: 3.0,
        }
    }
}

impl ChartStyle {
    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("series_line_width", self.series_line_width),
            ("projected_dash_px", self.projected_dash_px),
            ("grid_line_width", self.grid_line_width),
            ("grid_dash_px", self.grid_dash_px),
            ("font_size_px", self.font_size_px),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and > 0"
                )));
            }
        }
        for (name, value) in [
            ("projected_gap_px", self.projected_gap_px),
            ("grid_gap_px", self.grid_gap_px),
            ("annotation_padding_px", self.annotation_padding_px),
            ("annotation_corner_radius_px", self.annotation_corner_radius_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "style `{name}` must be finite and >= 0"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.region_fill_alpha) {
            return Err(ChartError::InvalidData(
                "style `region_fill_alpha` must be in [0, 1]".to_owned(),
            ));
        }
        for color in [
            self.series_color,
            self.confidence_band_color,
            self.grid_color,
            self.axis_color,
            self.annotation_color,
            self.annotation_background,
            self.inactive_label_background,
            self.active_label_text_color,
        ] {
            color.validate()?;
        }
        Ok(self)
    }
}

/// Per-chart configuration.
///
/// Serializable so dashboards can keep per-metric chart setup in config files;
/// omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub viewport: Viewport,
    pub margins: ChartMargins,
    pub trailing_days: u32,
    /// Right edge of the time axis; the last data point when `None`.
    pub time_domain_end: Option<DateTime<Utc>>,
    pub metric_fields: MetricFields,
    pub value_format: ValueFormat,
    pub style: ChartStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::new(DEFAULT_CHART_WIDTH, DEFAULT_CHART_HEIGHT),
            margins: ChartMargins::default(),
            trailing_days: DEFAULT_TRUNCATION_DAYS,
            time_domain_end: None,
            metric_fields: MetricFields::default(),
            value_format: ValueFormat::default(),
            style: ChartStyle::default(),
        }
    }
}

impl ChartConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_margins(mut self, margins: ChartMargins) -> Self {
        self.margins = margins;
        self
    }

    #[must_use]
    pub fn with_trailing_days(mut self, trailing_days: u32) -> Self {
        self.trailing_days = trailing_days;
        self
    }

    #[must_use]
    pub fn with_time_domain_end(mut self, end: DateTime<Utc>) -> Self {
        self.time_domain_end = Some(end);
        self
    }

    #[must_use]
    pub fn with_metric_fields(mut self, fields: MetricFields) -> Self {
        self.metric_fields = fields;
        self
    }

    #[must_use]
    pub fn with_value_format(mut self, format: ValueFormat) -> Self {
        self.value_format = format;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Checks everything a render cycle relies on.
    pub fn validate(&self) -> ChartResult<()> {
        self.margins.plot_bounds(self.viewport)?;
        self.style.validate()?;
        Ok(())
    }

    /// Serializes config to pretty JSON for debug/config files.
    ///
    /// Style colors are written with 8 bits per channel, so parsing the output
    /// yields [`Color::quantized`] colors.
    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes and validates config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }
}
