use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::core::ValidPoint;
use crate::error::{ChartError, ChartResult};

/// A series split into a confirmed prefix and a provisional suffix.
///
/// Both halves contain `truncation_point`, so the solid and dashed segments
/// drawn from them meet without a gap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncationSplit {
    pub confirmed: Vec<ValidPoint>,
    pub projected: Vec<ValidPoint>,
    pub truncation_point: ValidPoint,
    pub cutoff: DateTime<Utc>,
}

/// Splits `points` at `last timestamp - trailing_days`.
///
/// `points` must be sorted ascending by timestamp and already filtered.
/// `confirmed` holds every point at or before the cutoff; `projected` starts at
/// the last confirmed point and runs to the end. When no point falls at or
/// before the cutoff the first point anchors both halves.
pub fn truncate(points: &[ValidPoint], trailing_days: u32) -> ChartResult<TruncationSplit> {
    let last = points.last().ok_or(ChartError::EmptyInput)?;

    if points
        .windows(2)
        .any(|pair| pair[0].timestamp > pair[1].timestamp)
    {
        return Err(ChartError::InvalidData(
            "series must be sorted ascending by timestamp".to_owned(),
        ));
    }

    let window = TimeDelta::try_days(i64::from(trailing_days)).ok_or_else(|| {
        ChartError::InvalidData(format!("trailing window of {trailing_days} days overflows"))
    })?;
    let cutoff = last
        .timestamp
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let at_or_before = points.partition_point(|point| point.timestamp <= cutoff);
    let boundary = at_or_before.saturating_sub(1);

    Ok(TruncationSplit {
        confirmed: points[..=boundary].to_vec(),
        projected: points[boundary..].to_vec(),
        truncation_point: points[boundary],
        cutoff,
    })
}
