pub mod annotations;
pub mod color;
pub mod delaunay;
pub mod primitives;
pub mod regions;
pub mod scale;
pub mod series;
pub mod spatial_index;
pub mod time_scale;
pub mod truncation;
pub mod types;
pub mod zones;

pub use annotations::{
    BoxGeometry, BoxedAnnotation, LabelAnchor, ValueFormat, ZoneLabel, zone_labels,
};
pub use color::Color;
pub use regions::{
    Region, RegionBand, TOP_TICK_HEADROOM, compute_regions, compute_tick_positions,
    project_region_bands,
};
pub use scale::LinearScale;
pub use series::{
    MetricFields, SeriesRecord, filter_valid_points, points_from_records, project_confidence_band,
    project_path, project_points, records_from_json_str, value_extent,
};
pub use spatial_index::{SpatialIndex, VoronoiCell};
pub use time_scale::TimeScale;
pub use truncation::{TruncationSplit, truncate};
pub use types::{Bounds, ChartMargins, MetricPoint, ScaledPoint, ValidPoint, Viewport};
pub use zones::{ThresholdSet, Zone};
