mod composer;
mod config;
mod frame_builder;
mod presets;
mod request;

pub use composer::{ChartComposer, ChartGeometry, ComposerPhase, ValueTick, compose_geometry};
pub use config::{
    ChartConfig, ChartStyle, DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH, DEFAULT_TRUNCATION_DAYS,
};
pub use frame_builder::{build_frame, build_no_data_frame};
pub use presets::{MetricKind, ThresholdTable};
pub use request::{RequestId, RequestTracker};
