use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, unix_seconds_to_datetime};
use crate::core::{LinearScale, ValidPoint};
use crate::error::{ChartError, ChartResult};

/// Time axis mapping: linear interpolation over elapsed time between the
/// domain endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (DateTime<Utc>, DateTime<Utc>), range: (f64, f64)) -> ChartResult<Self> {
        let linear = LinearScale::new(
            (
                datetime_to_unix_seconds(domain.0),
                datetime_to_unix_seconds(domain.1),
            ),
            range,
        )?;
        Ok(Self {
            start: domain.0,
            end: domain.1,
            linear,
        })
    }

    /// Fits the domain from the first point to `domain_end` (or the last point).
    ///
    /// `points` must be sorted ascending by timestamp.
    pub fn from_points(
        points: &[ValidPoint],
        domain_end: Option<DateTime<Utc>>,
        range: (f64, f64),
    ) -> ChartResult<Self> {
        let (first, last) = match (points.first(), points.last()) {
            (Some(first), Some(last)) => (first.timestamp, last.timestamp),
            _ => return Err(ChartError::EmptyInput),
        };
        let end = domain_end.unwrap_or(last);
        Self::new((first, end), range)
    }

    #[must_use]
    pub fn domain(self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.start, self.end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        self.linear.range()
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.linear.is_degenerate()
    }

    #[must_use]
    pub fn map(self, time: DateTime<Utc>) -> f64 {
        self.linear.map(datetime_to_unix_seconds(time))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<DateTime<Utc>> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        unix_seconds_to_datetime(self.linear.invert(pixel))
    }
}
