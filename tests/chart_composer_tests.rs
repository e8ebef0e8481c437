use chrono::{DateTime, Duration, TimeZone, Utc};
use zone_chart::api::{ChartComposer, ChartConfig, ComposerPhase, MetricKind};
use zone_chart::core::{MetricPoint, Viewport};
use zone_chart::render::NullRenderer;
use zone_chart::{ChartError, ChartResult};

fn day(offset: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0)
        .single()
        .expect("valid date")
        + Duration::days(offset)
}

/// Ten daily Rt points rising from 1.00 to 1.09.
fn rt_series() -> Vec<MetricPoint> {
    (0..10)
        .map(|i| {
            let rt = 1.0 + 0.01 * i as f64;
            MetricPoint::complete(day(i), rt, rt - 0.2, rt + 0.2)
        })
        .collect()
}

fn rt_composer() -> ChartResult<ChartComposer> {
    ChartComposer::for_metric(MetricKind::CaseGrowthRate, Viewport::new(800, 400))
}

#[test]
fn composer_starts_idle_and_prepares_geometry() {
    let mut composer = rt_composer().expect("composer");
    assert!(matches!(composer.phase(), ComposerPhase::Idle));
    assert!(composer.geometry().is_none());

    composer.set_series(rt_series());
    assert!(matches!(composer.phase(), ComposerPhase::Filtering));

    let phase = composer.prepare().expect("prepare");
    assert!(phase.is_ready());

    let geometry = composer.geometry().expect("ready geometry");
    assert_eq!(geometry.plot.width, 755.0);
    assert_eq!(geometry.plot.height, 355.0);
    assert_eq!(geometry.scaled_points().len(), 10);
    assert_eq!(geometry.active_zone, "MEDIUM");
    assert_eq!(geometry.last_value_annotation.text, "1.09");

    let names: Vec<&str> = geometry.regions.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["LOW", "MEDIUM", "HIGH"]);

    let tick_values: Vec<f64> = geometry.ticks.iter().map(|tick| tick.value).collect();
    assert_eq!(tick_values.len(), 4);
    assert_eq!(tick_values[1], 0.9);
    assert_eq!(tick_values[2], 1.1);
    assert!((tick_values[3] - 1.65).abs() <= 1e-12);
    assert!((geometry.ticks[3].y - 0.0).abs() <= 1e-9);

    let active: Vec<bool> = geometry.zone_labels.iter().map(|l| l.is_active).collect();
    assert_eq!(active, vec![false, true, false]);
}

#[test]
fn truncation_splits_the_value_line() {
    let mut composer = rt_composer().expect("composer");
    composer.set_series(rt_series());
    composer.prepare().expect("prepare");
    let geometry = composer.geometry().expect("ready geometry");

    // Last day is Jan 10; the default seven-day window cuts at Jan 3.
    assert_eq!(geometry.truncation.truncation_point.timestamp, day(2));
    assert_eq!(geometry.confirmed_path.len(), 3);
    assert_eq!(geometry.projected_path.len(), 8);
    assert_eq!(geometry.confirmed_path.last(), geometry.projected_path.first());
    assert_eq!(geometry.confirmed_path[2], geometry.truncation_marker);
    assert_eq!(geometry.confidence_band.len(), 20);
}

#[test]
fn empty_or_invalid_series_ends_in_no_data() {
    let mut composer = rt_composer().expect("composer");
    composer.set_series(vec![MetricPoint::new(day(0), Some(1.0), None, Some(1.2))]);

    assert!(matches!(
        composer.prepare().expect("prepare"),
        ComposerPhase::NoData
    ));
    assert!(composer.geometry().is_none());

    let mut renderer = NullRenderer::default();
    composer.render(&mut renderer).expect("render no-data frame");
    assert_eq!(renderer.frames_rendered, 1);
    assert_eq!(renderer.last_text_count, 1);
    assert_eq!(renderer.last_line_count, 0);

    composer.set_series(Vec::new());
    assert!(matches!(
        composer.prepare().expect("prepare"),
        ComposerPhase::NoData
    ));
}

#[test]
fn render_emits_bands_segments_and_labels() {
    let mut composer = rt_composer().expect("composer");
    composer.set_series(rt_series());
    let mut renderer = NullRenderer::default();
    composer.render(&mut renderer).expect("render");

    // 3 region bands + 3 zone label boxes + last-value box.
    assert_eq!(renderer.last_rect_count, 7);
    assert_eq!(renderer.last_area_count, 1);
    // 4 grid lines + 2 confirmed + 7 projected segments + time axis.
    assert_eq!(renderer.last_line_count, 14);
    // 4 tick labels + 2 date labels + 3 zone labels + last value.
    assert_eq!(renderer.last_text_count, 10);
}

#[test]
fn any_input_change_discards_ready_geometry() {
    let mut composer = rt_composer().expect("composer");
    composer.set_series(rt_series());
    composer.prepare().expect("prepare");
    assert!(composer.phase().is_ready());

    composer.resize(Viewport::new(600, 300)).expect("resize");
    assert!(matches!(composer.phase(), ComposerPhase::Filtering));
    assert!(composer.hover(10.0, 10.0).is_none());

    composer.prepare().expect("prepare");
    let geometry = composer.geometry().expect("ready geometry");
    assert_eq!(geometry.plot.width, 555.0);

    let config = ChartConfig::new(Viewport::new(600, 300)).with_trailing_days(2);
    composer.set_config(config).expect("config");
    assert!(matches!(composer.phase(), ComposerPhase::Filtering));
}

#[test]
fn resize_rejects_unusable_viewports() {
    let mut composer = rt_composer().expect("composer");
    assert_eq!(
        composer.resize(Viewport::new(0, 400)),
        Err(ChartError::InvalidViewport {
            width: 0,
            height: 400
        })
    );
    assert!(matches!(
        composer.resize(Viewport::new(30, 30)),
        Err(ChartError::InvalidData(_))
    ));
}

#[test]
fn stale_responses_are_discarded() {
    let mut composer = rt_composer().expect("composer");
    let first = composer.begin_request();
    let second = composer.begin_request();

    assert!(!composer.complete_request(first, rt_series()));
    assert!(matches!(composer.phase(), ComposerPhase::Idle));

    assert!(composer.complete_request(second, rt_series()[..4].to_vec()));
    composer.prepare().expect("prepare");
    assert_eq!(
        composer.geometry().map(|g| g.scaled_points().len()),
        Some(4)
    );

    // A late answer to the first request must not replace the current data.
    assert!(!composer.complete_request(first, Vec::new()));
    assert!(composer.phase().is_ready());
}

#[test]
fn hover_snaps_to_the_nearest_point() {
    let mut composer = rt_composer().expect("composer");
    assert!(composer.hover(0.0, 0.0).is_none());

    composer.set_series(rt_series());
    assert!(composer.hover(0.0, 0.0).is_none());
    composer.prepare().expect("prepare");

    let target = composer.geometry().expect("ready geometry").scaled_points()[4];
    let hit = composer
        .hover(target.x + 3.0, target.y - 40.0)
        .copied()
        .expect("hit");
    assert_eq!(hit.timestamp, day(4));

    let margins = composer.config().margins;
    let snap = composer
        .pointer_move(target.x + margins.left, target.y + margins.top)
        .expect("snap");
    assert_eq!(snap.timestamp, day(4));
    assert!(composer.hover_state().is_visible());
    assert_eq!(composer.hover_state().snap(), Some(snap));

    composer.pointer_leave();
    assert!(!composer.hover_state().is_visible());
    assert_eq!(composer.hover_state().snap(), None);
}

#[test]
fn hover_cells_cover_every_point() {
    let mut composer = rt_composer().expect("composer");
    composer.set_series(rt_series());
    composer.prepare().expect("prepare");
    let geometry = composer.geometry().expect("ready geometry");

    let cells = geometry.hover_cells();
    assert_eq!(cells.len(), 10);
    assert!(cells.iter().all(|cell| cell.polygon.len() >= 3));
}
