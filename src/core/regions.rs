use serde::{Deserialize, Serialize};

use crate::core::{Color, LinearScale, ThresholdSet};

/// Headroom multiplier applied to the last zone boundary when picking the top tick.
pub const TOP_TICK_HEADROOM: f64 = 1.5;

/// A zone clamped to the chart's visible value range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub color: Color,
    pub value_from: f64,
    pub value_to: f64,
}

/// A region placed in pixel space, ready for filling and clipping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionBand {
    pub region: Region,
    pub y_top: f64,
    pub y_bottom: f64,
    /// Unique within one render pass.
    pub clip_id: String,
}

impl RegionBand {
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y_bottom - self.y_top
    }
}

/// Returns the regions intersecting `[visible_min, visible_max]`, bottom band first.
///
/// Each region is clamped to the visible range. The lowest and highest zones
/// absorb any part of the range outside the threshold span, matching the
/// clamped classification policy, so the regions tile the whole range.
/// Zones that only touch the range at a boundary are omitted.
#[must_use]
pub fn compute_regions(
    visible_min: f64,
    visible_max: f64,
    thresholds: &ThresholdSet,
) -> Vec<Region> {
    if !visible_min.is_finite() || !visible_max.is_finite() {
        return Vec::new();
    }
    let (min, max) = if visible_min <= visible_max {
        (visible_min, visible_max)
    } else {
        (visible_max, visible_min)
    };

    if min == max {
        let zone = thresholds.classify(min);
        return vec![Region {
            name: zone.name.clone(),
            color: zone.color,
            value_from: min,
            value_to: max,
        }];
    }

    let last = thresholds.len().saturating_sub(1);
    thresholds
        .zones()
        .iter()
        .enumerate()
        .filter_map(|(index, zone)| {
            let zone_lower = if index == 0 {
                f64::NEG_INFINITY
            } else {
                zone.lower_limit
            };
            let zone_upper = if index == last {
                f64::INFINITY
            } else {
                zone.upper_limit
            };
            let value_from = zone_lower.max(min);
            let value_to = zone_upper.min(max);
            (value_from < value_to).then(|| Region {
                name: zone.name.clone(),
                color: zone.color,
                value_from,
                value_to,
            })
        })
        .collect()
}

/// Value-axis ticks: the range floor, every interior zone boundary, then a top tick.
///
/// The top tick is `TOP_TICK_HEADROOM` times the last boundary unless the
/// data maximum already exceeds it, so the top zone stays visible even when
/// recent values are low. A single-zone set yields `[visible_min, visible_max]`.
#[must_use]
pub fn compute_tick_positions(
    visible_min: f64,
    visible_max: f64,
    thresholds: &ThresholdSet,
) -> Vec<f64> {
    let boundaries: Vec<f64> = thresholds.interior_boundaries().collect();
    let Some(&last_boundary) = boundaries.last() else {
        return vec![visible_min, visible_max];
    };

    let floor = TOP_TICK_HEADROOM * last_boundary;
    let top_tick = if visible_max < floor { floor } else { visible_max };

    let mut ticks = Vec::with_capacity(boundaries.len() + 2);
    ticks.push(visible_min);
    ticks.extend(boundaries);
    ticks.push(top_tick);
    ticks
}

/// Maps regions into pixel bands using the value scale.
#[must_use]
pub fn project_region_bands(regions: &[Region], value_scale: LinearScale) -> Vec<RegionBand> {
    regions
        .iter()
        .enumerate()
        .map(|(index, region)| {
            let from_px = value_scale.map(region.value_from);
            let to_px = value_scale.map(region.value_to);
            RegionBand {
                region: region.clone(),
                y_top: from_px.min(to_px),
                y_bottom: from_px.max(to_px),
                clip_id: format!("region-clip-{index}"),
            }
        })
        .collect()
}
