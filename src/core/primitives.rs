use chrono::{DateTime, Utc};

use crate::error::{ChartError, ChartResult};

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Converts fractional unix seconds back to a timestamp, rounded to the millisecond.
pub fn unix_seconds_to_datetime(seconds: f64) -> ChartResult<DateTime<Utc>> {
    if !seconds.is_finite() {
        return Err(ChartError::InvalidData(
            "unix seconds must be finite".to_owned(),
        ));
    }
    let millis = (seconds * 1000.0).round();
    if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
        return Err(ChartError::InvalidData(format!(
            "unix seconds {seconds} out of timestamp range"
        )));
    }
    DateTime::<Utc>::from_timestamp_millis(millis as i64).ok_or_else(|| {
        ChartError::InvalidData(format!("unix seconds {seconds} out of timestamp range"))
    })
}

/// Returns `(min, max)` of an iterator of finite values, or `None` when empty.
#[must_use]
pub fn finite_extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((min, max)) => Some((min.min(value), max.max(value))),
        })
}
