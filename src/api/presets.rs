use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Color, MetricFields, ThresholdSet, ValueFormat, Viewport, Zone};
use crate::error::{ChartError, ChartResult};

use super::ChartConfig;

/// Dashboard metrics with built-in zone tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Reproduction number (Rt).
    CaseGrowthRate,
    /// ICU utilization ratio.
    HospitalUsage,
    /// Share of tests that come back positive.
    PositiveTests,
}

impl MetricKind {
    pub const ALL: [Self; 3] = [Self::CaseGrowthRate, Self::HospitalUsage, Self::PositiveTests];

    /// Built-in LOW / MEDIUM / HIGH zones; the top zone is unbounded.
    pub fn thresholds(self) -> ChartResult<ThresholdSet> {
        let (medium_from, high_from) = match self {
            Self::CaseGrowthRate => (0.9, 1.1),
            Self::HospitalUsage => (0.5, 0.7),
            Self::PositiveTests => (0.03, 0.1),
        };
        ThresholdSet::new(vec![
            Zone::new("LOW", 0.0, medium_from, low_color()),
            Zone::new("MEDIUM", medium_from, high_from, medium_color()),
            Zone::new("HIGH", high_from, f64::INFINITY, high_color()),
        ])
    }

    #[must_use]
    pub fn metric_fields(self) -> MetricFields {
        match self {
            Self::CaseGrowthRate => MetricFields::new("rt", "low", "high"),
            Self::HospitalUsage => MetricFields::new("icu_utilization", "low", "high"),
            Self::PositiveTests => MetricFields::new("positive_rate", "low", "high"),
        }
    }

    #[must_use]
    pub fn value_format(self) -> ValueFormat {
        match self {
            Self::CaseGrowthRate => ValueFormat::Decimal { places: 2 },
            Self::HospitalUsage | Self::PositiveTests => ValueFormat::Percent { places: 0 },
        }
    }

    /// Default chart config for this metric.
    #[must_use]
    pub fn chart_config(self, viewport: Viewport) -> ChartConfig {
        ChartConfig::new(viewport)
            .with_metric_fields(self.metric_fields())
            .with_value_format(self.value_format())
    }
}

fn low_color() -> Color {
    Color::rgb8(0x00, 0xd4, 0x74)
}

fn medium_color() -> Color {
    Color::rgb8(0xff, 0xc9, 0x00)
}

fn high_color() -> Color {
    Color::rgb8(0xff, 0x00, 0x34)
}

/// Static zone configuration, one threshold set per metric.
///
/// `IndexMap` keeps insertion order so serialized tables stay stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdTable {
    sets: IndexMap<MetricKind, ThresholdSet>,
}

impl ThresholdTable {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sets: IndexMap::new(),
        }
    }

    /// Table holding the built-in set of every metric.
    pub fn presets() -> ChartResult<Self> {
        let mut table = Self::new();
        for kind in MetricKind::ALL {
            table.insert(kind, kind.thresholds()?);
        }
        Ok(table)
    }

    pub fn insert(&mut self, kind: MetricKind, thresholds: ThresholdSet) -> Option<ThresholdSet> {
        self.sets.insert(kind, thresholds)
    }

    #[must_use]
    pub fn get(&self, kind: MetricKind) -> Option<&ThresholdSet> {
        self.sets.get(&kind)
    }

    pub fn require(&self, kind: MetricKind) -> ChartResult<&ThresholdSet> {
        self.get(kind).ok_or_else(|| {
            ChartError::InvalidThresholds(format!("no threshold set configured for {kind:?}"))
        })
    }

    pub fn kinds(&self) -> impl Iterator<Item = MetricKind> + '_ {
        self.sets.keys().copied()
    }

    /// Loads a table; every set is validated while parsing.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidThresholds(format!("failed to parse thresholds: {e}")))
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize thresholds: {e}")))
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        Self::new()
    }
}
