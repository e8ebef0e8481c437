use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

#[cfg(feature = "parallel-projection")]
use rayon::prelude::*;

use crate::core::primitives::finite_extent;
use crate::core::{LinearScale, MetricPoint, ScaledPoint, TimeScale, ValidPoint};
use crate::error::{ChartError, ChartResult};

/// Raw upstream record: `{ "x": <time>, "y": { <metric fields> } | null }`.
///
/// `x` accepts epoch milliseconds, RFC 3339 strings or `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    #[serde(deserialize_with = "deserialize_record_time")]
    pub x: DateTime<Utc>,
    #[serde(default)]
    pub y: Option<Map<String, Value>>,
}

/// Names of the value/low/high keys inside a record's `y` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricFields {
    pub value: String,
    pub low: String,
    pub high: String,
}

impl Default for MetricFields {
    fn default() -> Self {
        Self::new("rt", "low", "high")
    }
}

impl MetricFields {
    #[must_use]
    pub fn new(value: impl Into<String>, low: impl Into<String>, high: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            low: low.into(),
            high: high.into(),
        }
    }

    /// Reads one record; absent, null or non-numeric fields become `None`.
    #[must_use]
    pub fn extract(&self, record: &SeriesRecord) -> MetricPoint {
        let field = |name: &str| {
            record
                .y
                .as_ref()
                .and_then(|fields| fields.get(name))
                .and_then(Value::as_f64)
        };
        MetricPoint::new(
            record.x,
            field(&self.value),
            field(&self.low),
            field(&self.high),
        )
    }
}

/// Parses a JSON array of records.
pub fn records_from_json_str(input: &str) -> ChartResult<Vec<SeriesRecord>> {
    serde_json::from_str(input)
        .map_err(|e| ChartError::InvalidData(format!("failed to parse series records: {e}")))
}

#[must_use]
pub fn points_from_records(records: &[SeriesRecord], fields: &MetricFields) -> Vec<MetricPoint> {
    records.iter().map(|record| fields.extract(record)).collect()
}

/// Drops incomplete points and returns the rest sorted by timestamp.
///
/// When several points share a timestamp the last one supplied wins.
#[must_use]
pub fn filter_valid_points(points: &[MetricPoint]) -> Vec<ValidPoint> {
    let mut valid: Vec<ValidPoint> = points.iter().filter_map(MetricPoint::to_valid).collect();
    let incomplete_count = points.len() - valid.len();
    valid.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    let mut deduped: Vec<ValidPoint> = Vec::with_capacity(valid.len());
    let mut duplicate_count = 0_usize;
    for point in valid {
        if let Some(last) = deduped.last_mut() {
            if point.timestamp.cmp(&last.timestamp) == Ordering::Equal {
                *last = point;
                duplicate_count += 1;
                continue;
            }
        }
        deduped.push(point);
    }

    if incomplete_count > 0 {
        debug!(
            incomplete_count,
            valid_count = deduped.len(),
            "dropped incomplete points"
        );
    }
    if duplicate_count > 0 {
        warn!(
            duplicate_count,
            valid_count = deduped.len(),
            "collapsed points sharing a timestamp"
        );
    }
    deduped
}

/// `(min(low), max(high))` over the series, widened by the central values.
#[must_use]
pub fn value_extent(points: &[ValidPoint]) -> Option<(f64, f64)> {
    let min = finite_extent(points.iter().map(|p| p.low.min(p.value)))?.0;
    let max = finite_extent(points.iter().map(|p| p.high.max(p.value)))?.1;
    Some((min, max))
}

/// Places every point's central value in plot-area pixels.
#[must_use]
pub fn project_points(
    points: &[ValidPoint],
    time_scale: TimeScale,
    value_scale: LinearScale,
) -> Vec<ScaledPoint<ValidPoint>> {
    let project = |point: &ValidPoint| {
        ScaledPoint::new(
            time_scale.map(point.timestamp),
            value_scale.map(point.value),
            *point,
        )
    };

    // Large series can be projected in parallel; output order is unchanged.
    #[cfg(feature = "parallel-projection")]
    {
        points.par_iter().map(project).collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        points.iter().map(project).collect()
    }
}

/// Polyline vertices for the central value of `points`.
#[must_use]
pub fn project_path(
    points: &[ValidPoint],
    time_scale: TimeScale,
    value_scale: LinearScale,
) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|point| (time_scale.map(point.timestamp), value_scale.map(point.value)))
        .collect()
}

/// Closed polygon between the high and low edges of the confidence interval.
///
/// Runs along `high` left to right, then back along `low`. Empty for fewer
/// than two points.
#[must_use]
pub fn project_confidence_band(
    points: &[ValidPoint],
    time_scale: TimeScale,
    value_scale: LinearScale,
) -> Vec<(f64, f64)> {
    if points.len() < 2 {
        return Vec::new();
    }
    let upper = points
        .iter()
        .map(|point| (time_scale.map(point.timestamp), value_scale.map(point.high)));
    let lower = points
        .iter()
        .rev()
        .map(|point| (time_scale.map(point.timestamp), value_scale.map(point.low)));
    upper.chain(lower).collect()
}

fn deserialize_record_time<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTime {
        Millis(i64),
        Text(String),
    }

    match RawTime::deserialize(deserializer)? {
        RawTime::Millis(millis) => DateTime::<Utc>::from_timestamp_millis(millis)
            .ok_or_else(|| D::Error::custom(format!("timestamp {millis}ms out of range"))),
        RawTime::Text(text) => parse_record_time(&text).map_err(D::Error::custom),
    }
}

fn parse_record_time(text: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(time) = DateTime::parse_from_rfc3339(text) {
        return Ok(time.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("unrecognized record time `{text}`"))
}

#[cfg(test)]
mod tests {
    use super::parse_record_time;

    #[test]
    fn record_time_accepts_rfc3339_and_plain_dates() {
        let from_rfc = parse_record_time("2020-05-01T00:00:00Z").expect("rfc3339");
        let from_date = parse_record_time("2020-05-01").expect("date");
        assert_eq!(from_rfc, from_date);
        assert!(parse_record_time("May 1st").is_err());
    }
}
