use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::error::{ChartError, ChartResult};

/// A named severity band `[lower_limit, upper_limit)` with its display color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    pub lower_limit: f64,
    #[serde(default = "unbounded", skip_serializing_if = "is_unbounded")]
    pub upper_limit: f64,
    pub color: Color,
}

impl Zone {
    #[must_use]
    pub fn new(name: impl Into<String>, lower_limit: f64, upper_limit: f64, color: Color) -> Self {
        Self {
            name: name.into(),
            lower_limit,
            upper_limit,
            color,
        }
    }
}

fn unbounded() -> f64 {
    f64::INFINITY
}

fn is_unbounded(value: &f64) -> bool {
    *value == f64::INFINITY
}

/// Ordered, gap-free zones covering a metric's value line.
///
/// Invariants checked once by [`ThresholdSet::new`]:
/// - at least one zone, every name non-empty
/// - `lower_limit < upper_limit` for every zone, the first lower limit finite
/// - `zones[i].upper_limit == zones[i + 1].lower_limit`
/// - only the top zone may be unbounded above
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Zone>", into = "Vec<Zone>")]
pub struct ThresholdSet {
    zones: Vec<Zone>,
}

impl ThresholdSet {
    pub fn new(zones: Vec<Zone>) -> ChartResult<Self> {
        let Some(first) = zones.first() else {
            return Err(ChartError::InvalidThresholds(
                "threshold set needs at least one zone".to_owned(),
            ));
        };
        if !first.lower_limit.is_finite() {
            return Err(ChartError::InvalidThresholds(format!(
                "zone `{}` lower limit must be finite",
                first.name
            )));
        }

        let last_index = zones.len() - 1;
        for (index, zone) in zones.iter().enumerate() {
            if zone.name.trim().is_empty() {
                return Err(ChartError::InvalidThresholds(format!(
                    "zone #{index} has an empty name"
                )));
            }
            if zone.upper_limit.is_nan() || !(zone.lower_limit < zone.upper_limit) {
                return Err(ChartError::InvalidThresholds(format!(
                    "zone `{}` must satisfy lower < upper (got {}..{})",
                    zone.name, zone.lower_limit, zone.upper_limit
                )));
            }
            if index < last_index && !zone.upper_limit.is_finite() {
                return Err(ChartError::InvalidThresholds(format!(
                    "only the top zone may be unbounded, `{}` is not the top zone",
                    zone.name
                )));
            }
            zone.color.validate().map_err(|err| {
                ChartError::InvalidThresholds(format!("zone `{}`: {err}", zone.name))
            })?;
        }

        for pair in zones.windows(2) {
            if pair[0].upper_limit != pair[1].lower_limit {
                return Err(ChartError::InvalidThresholds(format!(
                    "zones `{}` and `{}` must share a boundary ({} != {})",
                    pair[0].name, pair[1].name, pair[0].upper_limit, pair[1].lower_limit
                )));
            }
        }

        Ok(Self { zones })
    }

    #[must_use]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Covered value span: lowest lower limit to highest upper limit.
    #[must_use]
    pub fn span(&self) -> (f64, f64) {
        let lower = self.zones.first().map_or(0.0, |zone| zone.lower_limit);
        let upper = self.zones.last().map_or(0.0, |zone| zone.upper_limit);
        (lower, upper)
    }

    /// Boundaries shared by adjacent zones, ascending.
    pub fn interior_boundaries(&self) -> impl Iterator<Item = f64> + '_ {
        self.zones
            .iter()
            .take(self.zones.len().saturating_sub(1))
            .map(|zone| zone.upper_limit)
    }

    /// Rank (index) of the zone `value` falls in.
    ///
    /// Boundaries are inclusive-lower, exclusive-upper, except the top zone
    /// which also owns its upper bound. Out-of-range values clamp to the
    /// lowest or highest zone; NaN lands in the lowest zone.
    #[must_use]
    pub fn classify_rank(&self, value: f64) -> usize {
        let rank = self.zones.partition_point(|zone| zone.upper_limit <= value);
        rank.min(self.zones.len().saturating_sub(1))
    }

    #[must_use]
    pub fn classify(&self, value: f64) -> &Zone {
        &self.zones[self.classify_rank(value)]
    }
}

impl TryFrom<Vec<Zone>> for ThresholdSet {
    type Error = ChartError;

    fn try_from(value: Vec<Zone>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ThresholdSet> for Vec<Zone> {
    fn from(value: ThresholdSet) -> Self {
        value.zones
    }
}
