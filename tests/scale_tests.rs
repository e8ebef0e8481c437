use approx::{assert_abs_diff_eq, assert_relative_eq};
use chrono::{Duration, TimeZone, Utc};
use zone_chart::ChartError;
use zone_chart::core::{LinearScale, TimeScale, ValidPoint};

#[test]
fn linear_scale_maps_and_inverts() {
    let scale = LinearScale::new((0.5, 3.0), (355.0, 0.0)).expect("valid scale");

    assert_relative_eq!(scale.map(0.5), 355.0);
    assert_abs_diff_eq!(scale.map(3.0), 0.0);
    assert_relative_eq!(scale.map(1.75), 177.5);
    assert_relative_eq!(scale.invert(scale.map(1.234)), 1.234, epsilon = 1e-12);
}

#[test]
fn linear_scale_extrapolates_outside_the_domain() {
    let scale = LinearScale::new((0.0, 10.0), (0.0, 100.0)).expect("valid scale");
    assert_relative_eq!(scale.map(-1.0), -10.0, epsilon = 1e-9);
    assert_relative_eq!(scale.map(12.0), 120.0, epsilon = 1e-9);
}

#[test]
fn degenerate_domain_maps_to_range_start() {
    let scale = LinearScale::new((2.0, 2.0), (400.0, 0.0)).expect("degenerate is allowed");
    assert!(scale.is_degenerate());
    assert_eq!(scale.map(2.0), 400.0);
    assert_eq!(scale.map(7.0), 400.0);
}

#[test]
fn degenerate_range_inverts_to_domain_start() {
    let scale = LinearScale::new((1.0, 5.0), (10.0, 10.0)).expect("valid scale");
    assert_eq!(scale.invert(10.0), 1.0);
}

#[test]
fn non_finite_endpoints_are_rejected() {
    assert!(matches!(
        LinearScale::new((0.0, f64::NAN), (0.0, 1.0)),
        Err(ChartError::InvalidData(_))
    ));
    assert!(LinearScale::new((0.0, 1.0), (f64::INFINITY, 0.0)).is_err());
}

#[test]
fn time_scale_spans_first_point_to_configured_end() {
    let start = Utc
        .with_ymd_and_hms(2020, 4, 1, 0, 0, 0)
        .single()
        .expect("valid date");
    let points: Vec<ValidPoint> = (0..5)
        .map(|day| ValidPoint {
            timestamp: start + Duration::days(day),
            value: 1.0,
            low: 0.9,
            high: 1.1,
        })
        .collect();

    let fitted = TimeScale::from_points(&points, None, (0.0, 800.0)).expect("time scale");
    assert_eq!(fitted.domain(), (start, start + Duration::days(4)));
    assert_relative_eq!(fitted.map(start + Duration::days(2)), 400.0);

    let extended = TimeScale::from_points(&points, Some(start + Duration::days(8)), (0.0, 800.0))
        .expect("time scale");
    assert_relative_eq!(extended.map(start + Duration::days(4)), 400.0);

    let recovered = extended.invert(600.0).expect("invert");
    assert_eq!(recovered, start + Duration::days(6));
}

#[test]
fn time_scale_needs_points() {
    assert_eq!(
        TimeScale::from_points(&[], None, (0.0, 100.0)),
        Err(ChartError::EmptyInput)
    );
}

#[test]
fn single_point_time_scale_is_degenerate() {
    let at = Utc
        .with_ymd_and_hms(2020, 4, 1, 0, 0, 0)
        .single()
        .expect("valid date");
    let points = [ValidPoint {
        timestamp: at,
        value: 1.0,
        low: 1.0,
        high: 1.0,
    }];
    let scale = TimeScale::from_points(&points, None, (0.0, 500.0)).expect("time scale");
    assert!(scale.is_degenerate());
    assert_eq!(scale.map(at), 0.0);
}
