use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::api::frame_builder::{build_frame, build_no_data_frame};
use crate::api::{ChartConfig, MetricKind, RequestId, RequestTracker};
use crate::core::{
    Bounds, BoxedAnnotation, ChartMargins, LabelAnchor, LinearScale, MetricPoint, Region,
    RegionBand, ScaledPoint, SpatialIndex, ThresholdSet, TimeScale, TruncationSplit, ValidPoint,
    Viewport, VoronoiCell, ZoneLabel, compute_regions, compute_tick_positions,
    filter_valid_points, project_confidence_band, project_path, project_points,
    project_region_bands, truncate, value_extent, zone_labels,
};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{HoverSnap, HoverState};
use crate::render::{RenderFrame, Renderer};

/// Value-axis tick with its plot-area pixel row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueTick {
    pub value: f64,
    pub y: f64,
}

/// Everything one render cycle draws, in plot-area pixels.
#[derive(Debug, Clone)]
pub struct ChartGeometry {
    pub viewport: Viewport,
    pub margins: ChartMargins,
    pub plot: Bounds,
    pub time_scale: TimeScale,
    pub value_scale: LinearScale,
    pub confirmed_path: Vec<(f64, f64)>,
    pub projected_path: Vec<(f64, f64)>,
    pub confidence_band: Vec<(f64, f64)>,
    pub regions: Vec<Region>,
    pub region_bands: Vec<RegionBand>,
    pub ticks: Vec<ValueTick>,
    pub truncation: TruncationSplit,
    /// Pixel position where the solid line turns dashed.
    pub truncation_marker: (f64, f64),
    pub active_zone: String,
    pub last_value_annotation: BoxedAnnotation,
    pub zone_labels: Vec<ZoneLabel>,
    pub index: SpatialIndex<ValidPoint>,
}

impl ChartGeometry {
    /// Value-line points in plot-area pixels, in timestamp order.
    #[must_use]
    pub fn scaled_points(&self) -> &[ScaledPoint<ValidPoint>] {
        self.index.points()
    }

    /// Clipped Voronoi cells, one per distinct pixel site, for hover overlays.
    #[must_use]
    pub fn hover_cells(&self) -> Vec<VoronoiCell> {
        self.index.cells()
    }
}

/// Lifecycle of one chart instance.
#[derive(Debug, Clone, Default)]
pub enum ComposerPhase {
    /// No series supplied yet.
    #[default]
    Idle,
    /// Input accepted; geometry is rebuilt on the next `prepare`.
    Filtering,
    Ready(Box<ChartGeometry>),
    /// Series was empty or had no complete points.
    NoData,
}

impl ComposerPhase {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Filtering => "filtering",
            Self::Ready(_) => "ready",
            Self::NoData => "no_data",
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Owns one chart's input and derives its geometry on demand.
///
/// Every input change drops the current geometry and re-enters `Filtering`;
/// hover queries only read the geometry of a `Ready` phase.
#[derive(Debug)]
pub struct ChartComposer {
    config: ChartConfig,
    thresholds: ThresholdSet,
    series: Option<Vec<MetricPoint>>,
    phase: ComposerPhase,
    requests: RequestTracker,
    hover: HoverState,
}

impl ChartComposer {
    pub fn new(config: ChartConfig, thresholds: ThresholdSet) -> ChartResult<Self> {
        config.validate()?;
        debug!(
            width = config.viewport.width,
            height = config.viewport.height,
            zones = thresholds.len(),
            trailing_days = config.trailing_days,
            "create chart composer"
        );
        Ok(Self {
            config,
            thresholds,
            series: None,
            phase: ComposerPhase::Idle,
            requests: RequestTracker::default(),
            hover: HoverState::default(),
        })
    }

    /// Composer using a metric's preset config and zones.
    pub fn for_metric(kind: MetricKind, viewport: Viewport) -> ChartResult<Self> {
        Self::new(kind.chart_config(viewport), kind.thresholds()?)
    }

    #[must_use]
    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    #[must_use]
    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    #[must_use]
    pub fn phase(&self) -> &ComposerPhase {
        &self.phase
    }

    #[must_use]
    pub fn hover_state(&self) -> HoverState {
        self.hover
    }

    /// Replaces the series; prior data is discarded, never merged.
    pub fn set_series(&mut self, points: Vec<MetricPoint>) {
        debug!(points = points.len(), "set series");
        self.series = Some(points);
        self.restart("series replaced");
    }

    pub fn resize(&mut self, viewport: Viewport) -> ChartResult<()> {
        self.config.margins.plot_bounds(viewport)?;
        if self.config.viewport == viewport {
            return Ok(());
        }
        debug!(width = viewport.width, height = viewport.height, "resize chart");
        self.config.viewport = viewport;
        self.restart("viewport resized");
        Ok(())
    }

    pub fn set_config(&mut self, config: ChartConfig) -> ChartResult<()> {
        config.validate()?;
        self.config = config;
        self.restart("config replaced");
        Ok(())
    }

    pub fn set_thresholds(&mut self, thresholds: ThresholdSet) {
        self.thresholds = thresholds;
        self.restart("thresholds replaced");
    }

    /// Issues the id for a new series fetch; earlier fetches become stale.
    pub fn begin_request(&mut self) -> RequestId {
        let id = self.requests.begin();
        trace!(request = id.get(), "begin series request");
        id
    }

    /// Applies a fetch result if `id` is still the latest request.
    ///
    /// Returns `false` and leaves state untouched for superseded requests.
    pub fn complete_request(&mut self, id: RequestId, points: Vec<MetricPoint>) -> bool {
        if !self.requests.is_current(id) {
            debug!(
                request = id.get(),
                latest = self.requests.latest().map(RequestId::get),
                "discard stale series response"
            );
            return false;
        }
        self.set_series(points);
        true
    }

    /// Runs the pending cycle, if any, and returns the resulting phase.
    ///
    /// An empty or fully invalid series lands in `NoData`; other failures are
    /// returned and leave the composer in `Filtering`.
    pub fn prepare(&mut self) -> ChartResult<&ComposerPhase> {
        if matches!(self.phase, ComposerPhase::Filtering) {
            let series = self.series.as_deref().unwrap_or_default();
            match compose_geometry(&self.config, &self.thresholds, series) {
                Ok(geometry) => {
                    debug!(
                        points = geometry.index.len(),
                        regions = geometry.region_bands.len(),
                        active_zone = %geometry.active_zone,
                        "chart geometry ready"
                    );
                    self.phase = ComposerPhase::Ready(Box::new(geometry));
                }
                Err(ChartError::EmptyInput) => {
                    debug!("series has no valid points");
                    self.phase = ComposerPhase::NoData;
                }
                Err(err) => {
                    warn!(error = %err, "chart geometry failed");
                    return Err(err);
                }
            }
        }
        Ok(&self.phase)
    }

    #[must_use]
    pub fn geometry(&self) -> Option<&ChartGeometry> {
        match &self.phase {
            ComposerPhase::Ready(geometry) => Some(geometry.as_ref()),
            _ => None,
        }
    }

    /// Frame for the current phase, preparing first if needed.
    pub fn build_render_frame(&mut self) -> ChartResult<RenderFrame> {
        self.prepare()?;
        let frame = match &self.phase {
            ComposerPhase::Ready(geometry) => build_frame(geometry, &self.config),
            ComposerPhase::NoData => build_no_data_frame(&self.config),
            ComposerPhase::Idle | ComposerPhase::Filtering => {
                RenderFrame::new(self.config.viewport)
            }
        };
        Ok(frame)
    }

    pub fn render<R: Renderer>(&mut self, renderer: &mut R) -> ChartResult<()> {
        let frame = self.build_render_frame()?;
        trace!(
            phase = self.phase.name(),
            rects = frame.rects.len(),
            lines = frame.lines.len(),
            texts = frame.texts.len(),
            "render frame"
        );
        renderer.render(&frame)
    }

    /// Point whose Voronoi cell contains the plot-area position `(px, py)`.
    ///
    /// `None` unless the composer is `Ready`.
    #[must_use]
    pub fn hover(&self, px: f64, py: f64) -> Option<&ValidPoint> {
        self.geometry()?.index.nearest(px, py)
    }

    /// Tracks the pointer in viewport coordinates and snaps it to the nearest point.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<HoverSnap> {
        self.hover.on_pointer_move(x, y);
        let margins = self.config.margins;
        let snap = self.geometry().and_then(|geometry| {
            geometry
                .index
                .nearest_point(x - margins.left, y - margins.top)
                .map(HoverSnap::from)
        });
        self.hover.set_snap(snap);
        snap
    }

    pub fn pointer_leave(&mut self) {
        self.hover.on_pointer_leave();
    }

    fn restart(&mut self, reason: &'static str) {
        if self.series.is_none() {
            return;
        }
        trace!(from = self.phase.name(), reason, "restart chart cycle");
        self.phase = ComposerPhase::Filtering;
        self.hover.clear_snap();
    }
}

/// Builds one cycle's geometry from raw points.
///
/// Fails with `EmptyInput` when no point survives filtering.
pub fn compose_geometry(
    config: &ChartConfig,
    thresholds: &ThresholdSet,
    series: &[MetricPoint],
) -> ChartResult<ChartGeometry> {
    let points = filter_valid_points(series);
    let truncation = truncate(&points, config.trailing_days)?;
    let plot = config.margins.plot_bounds(config.viewport)?;

    let time_scale = TimeScale::from_points(&points, config.time_domain_end, (0.0, plot.width))?;
    let (data_min, data_max) = value_extent(&points).ok_or(ChartError::EmptyInput)?;
    let tick_values = compute_tick_positions(data_min, data_max, thresholds);
    let top_tick = tick_values.last().copied().unwrap_or(data_max);
    let value_scale = LinearScale::new((data_min, top_tick), (plot.height, 0.0))?;

    let regions = compute_regions(data_min, top_tick, thresholds);
    let region_bands = project_region_bands(&regions, value_scale);
    let ticks = tick_values
        .into_iter()
        .filter(|value| (data_min..=top_tick).contains(value))
        .map(|value| ValueTick {
            value,
            y: value_scale.map(value),
        })
        .collect();

    let confirmed_path = project_path(&truncation.confirmed, time_scale, value_scale);
    let projected_path = project_path(&truncation.projected, time_scale, value_scale);
    let confidence_band = project_confidence_band(&points, time_scale, value_scale);
    let truncation_marker = (
        time_scale.map(truncation.truncation_point.timestamp),
        value_scale.map(truncation.truncation_point.value),
    );

    let last = points.last().copied().ok_or(ChartError::EmptyInput)?;
    let active_zone = thresholds.classify(last.value).name.clone();
    let style = config.style;
    let last_value_annotation = place_last_value_annotation(
        config.value_format.format(last.value),
        (time_scale.map(last.timestamp), value_scale.map(last.value)),
        plot,
        style.font_size_px,
        style.annotation_padding_px,
    );
    let zone_labels = zone_labels(
        &region_bands,
        Some(active_zone.as_str()),
        plot.width,
        style.font_size_px,
        style.annotation_padding_px,
    );

    let scaled = project_points(&points, time_scale, value_scale);
    let index = SpatialIndex::build(scaled, plot);

    Ok(ChartGeometry {
        viewport: config.viewport,
        margins: config.margins,
        plot,
        time_scale,
        value_scale,
        confirmed_path,
        projected_path,
        confidence_band,
        regions,
        region_bands,
        ticks,
        truncation,
        truncation_marker,
        active_zone,
        last_value_annotation,
        zone_labels,
        index,
    })
}

/// Centers the label above the last point, kept inside the plot horizontally.
fn place_last_value_annotation(
    text: String,
    anchor: (f64, f64),
    plot: Bounds,
    font_size_px: f64,
    padding: f64,
) -> BoxedAnnotation {
    let half_height = font_size_px / 2.0 + padding;
    let y = (anchor.1 - 2.0 * half_height).max(half_height);
    let mut annotation = BoxedAnnotation::new(
        text,
        anchor.0,
        y,
        LabelAnchor::Middle,
        font_size_px,
        padding,
    );
    let overflow = annotation.frame.x + annotation.frame.width - plot.width;
    if overflow > 0.0 {
        annotation = BoxedAnnotation::new(
            annotation.text,
            anchor.0 - overflow,
            y,
            LabelAnchor::Middle,
            font_size_px,
            padding,
        );
    }
    annotation
}
