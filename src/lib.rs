//! zone-chart: threshold-zone time-series chart engine.
//!
//! Classifies metric values into risk zones, splits series into confirmed and
//! provisional segments, and composes backend-agnostic render geometry with
//! nearest-point hover lookup.

pub mod api;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{ChartComposer, ChartConfig, ComposerPhase};
pub use error::{ChartError, ChartResult};
