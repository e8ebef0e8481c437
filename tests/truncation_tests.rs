use chrono::{DateTime, TimeZone, Utc};
use zone_chart::ChartError;
use zone_chart::core::{MetricPoint, ValidPoint, filter_valid_points, truncate};

fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, day, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn point(day: u32, value: f64) -> ValidPoint {
    ValidPoint {
        timestamp: jan(day),
        value,
        low: value - 0.1,
        high: value + 0.1,
    }
}

#[test]
fn incomplete_points_are_filtered_before_splitting() {
    let raw = vec![
        MetricPoint::complete(jan(1), 1.0, 0.9, 1.1),
        MetricPoint::complete(jan(2), 1.1, 1.0, 1.2),
        MetricPoint::new(jan(3), Some(1.2), None, Some(1.3)),
        MetricPoint::complete(jan(4), 1.3, 1.2, 1.4),
    ];
    let points = filter_valid_points(&raw);
    let timestamps: Vec<_> = points.iter().map(|p| p.timestamp).collect();
    assert_eq!(timestamps, vec![jan(1), jan(2), jan(4)]);

    let split = truncate(&points, 1).expect("split");
    assert_eq!(split.cutoff, jan(3));
    assert_eq!(split.confirmed, vec![points[0], points[1]]);
    assert_eq!(split.projected, vec![points[1], points[2]]);
    assert_eq!(split.truncation_point, points[1]);
}

#[test]
fn cutoff_point_itself_is_confirmed() {
    let points: Vec<ValidPoint> = (1..=10).map(|day| point(day, 1.0)).collect();
    let split = truncate(&points, 7).expect("split");

    assert_eq!(split.cutoff, jan(3));
    assert_eq!(split.confirmed.len(), 3);
    assert_eq!(split.truncation_point.timestamp, jan(3));
    assert_eq!(split.projected.first().map(|p| p.timestamp), Some(jan(3)));
    assert_eq!(split.projected.last().map(|p| p.timestamp), Some(jan(10)));
}

#[test]
fn window_longer_than_series_keeps_first_point_as_anchor() {
    let points = vec![point(5, 1.0), point(6, 1.1)];
    let split = truncate(&points, 30).expect("split");

    assert_eq!(split.confirmed, vec![points[0]]);
    assert_eq!(split.projected, points);
    assert_eq!(split.truncation_point, points[0]);
}

#[test]
fn single_point_is_both_confirmed_and_projected() {
    let points = vec![point(1, 0.8)];
    let split = truncate(&points, 7).expect("split");
    assert_eq!(split.confirmed, points);
    assert_eq!(split.projected, points);
}

#[test]
fn empty_series_is_reported() {
    assert_eq!(truncate(&[], 7), Err(ChartError::EmptyInput));

    let all_invalid = vec![MetricPoint::new(jan(1), None, None, None)];
    let points = filter_valid_points(&all_invalid);
    assert_eq!(truncate(&points, 7), Err(ChartError::EmptyInput));
}
