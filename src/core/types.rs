use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Full chart surface in device pixels, margins included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plot area for axes and annotations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartMargins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for ChartMargins {
    fn default() -> Self {
        Self {
            top: 5.0,
            right: 5.0,
            bottom: 40.0,
            left: 40.0,
        }
    }
}

impl ChartMargins {
    pub fn validate(self) -> ChartResult<Self> {
        for (side, value) in [
            ("top", self.top),
            ("right", self.right),
            ("bottom", self.bottom),
            ("left", self.left),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "chart margin `{side}` must be finite and >= 0"
                )));
            }
        }
        Ok(self)
    }

    /// Returns the plot area left after removing margins from `viewport`.
    pub fn plot_bounds(self, viewport: Viewport) -> ChartResult<Bounds> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let margins = self.validate()?;
        let width = f64::from(viewport.width) - margins.left - margins.right;
        let height = f64::from(viewport.height) - margins.top - margins.bottom;
        if width <= 0.0 || height <= 0.0 {
            return Err(ChartError::InvalidData(format!(
                "margins leave no plot area in {}x{} viewport",
                viewport.width, viewport.height
            )));
        }
        Ok(Bounds::new(width, height))
    }
}

/// Pixel extent of the plot area; the origin is its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn contains(self, x: f64, y: f64) -> bool {
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}

/// One observation or projection, possibly with missing components.
///
/// Missing components mark gaps in the upstream series. They are filtered out
/// before any geometry is computed and never read as zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub value_low: Option<f64>,
    #[serde(default)]
    pub value_high: Option<f64>,
}

impl MetricPoint {
    #[must_use]
    pub fn new(
        timestamp: DateTime<Utc>,
        value: Option<f64>,
        value_low: Option<f64>,
        value_high: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            value,
            value_low,
            value_high,
        }
    }

    /// Builds a point with every component present.
    #[must_use]
    pub fn complete(timestamp: DateTime<Utc>, value: f64, value_low: f64, value_high: f64) -> Self {
        Self::new(timestamp, Some(value), Some(value_low), Some(value_high))
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.to_valid().is_some()
    }

    /// Returns the complete form when value, low and high are all present and finite.
    #[must_use]
    pub fn to_valid(&self) -> Option<ValidPoint> {
        let value = self.value.filter(|v| v.is_finite())?;
        let low = self.value_low.filter(|v| v.is_finite())?;
        let high = self.value_high.filter(|v| v.is_finite())?;
        Some(ValidPoint {
            timestamp: self.timestamp,
            value,
            low,
            high,
        })
    }
}

/// A `MetricPoint` that passed validity filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub low: f64,
    pub high: f64,
}

impl ValidPoint {
    #[must_use]
    pub fn to_metric_point(self) -> MetricPoint {
        MetricPoint::complete(self.timestamp, self.value, self.low, self.high)
    }
}

impl From<ValidPoint> for MetricPoint {
    fn from(value: ValidPoint) -> Self {
        value.to_metric_point()
    }
}

/// A datum placed at pixel coordinates inside the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledPoint<T> {
    pub x: f64,
    pub y: f64,
    pub data: T,
}

impl<T> ScaledPoint<T> {
    #[must_use]
    pub fn new(x: f64, y: f64, data: T) -> Self {
        Self { x, y, data }
    }

    #[must_use]
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}
