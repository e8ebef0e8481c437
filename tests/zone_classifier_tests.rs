use zone_chart::ChartError;
use zone_chart::api::MetricKind;
use zone_chart::core::{Color, ThresholdSet, Zone};

fn rt_zones() -> ThresholdSet {
    MetricKind::CaseGrowthRate
        .thresholds()
        .expect("preset thresholds")
}

#[test]
fn values_land_in_their_half_open_zone() {
    let zones = rt_zones();
    assert_eq!(zones.classify(0.5).name, "LOW");
    assert_eq!(zones.classify(0.95).name, "MEDIUM");
    assert_eq!(zones.classify(1.4).name, "HIGH");
}

#[test]
fn boundary_value_belongs_to_the_upper_zone() {
    let zones = rt_zones();
    assert_eq!(zones.classify(0.9).name, "MEDIUM");
    assert_eq!(zones.classify(1.1).name, "HIGH");
}

#[test]
fn out_of_range_values_clamp_to_the_outer_zones() {
    let zones = rt_zones();
    assert_eq!(zones.classify(-3.0).name, "LOW");
    assert_eq!(zones.classify(f64::INFINITY).name, "HIGH");
    assert_eq!(zones.classify(1.0e9).name, "HIGH");
}

#[test]
fn nan_classifies_into_the_lowest_zone() {
    assert_eq!(rt_zones().classify_rank(f64::NAN), 0);
}

#[test]
fn bounded_top_zone_owns_its_upper_limit() {
    let color = Color::rgb(0.2, 0.4, 0.6);
    let zones = ThresholdSet::new(vec![
        Zone::new("A", 0.0, 1.0, color),
        Zone::new("B", 1.0, 2.0, color),
    ])
    .expect("valid zones");

    assert_eq!(zones.classify(2.0).name, "B");
    assert_eq!(zones.classify(2.5).name, "B");
}

#[test]
fn construction_rejects_gaps_and_empty_sets() {
    let color = Color::rgb(0.0, 0.0, 0.0);

    assert!(matches!(
        ThresholdSet::new(Vec::new()),
        Err(ChartError::InvalidThresholds(_))
    ));

    let gap = ThresholdSet::new(vec![
        Zone::new("A", 0.0, 1.0, color),
        Zone::new("B", 1.5, 2.0, color),
    ]);
    assert!(matches!(gap, Err(ChartError::InvalidThresholds(_))));

    let inverted = ThresholdSet::new(vec![Zone::new("A", 2.0, 1.0, color)]);
    assert!(matches!(inverted, Err(ChartError::InvalidThresholds(_))));

    let open_middle = ThresholdSet::new(vec![
        Zone::new("A", 0.0, f64::INFINITY, color),
        Zone::new("B", f64::INFINITY, f64::INFINITY, color),
    ]);
    assert!(matches!(open_middle, Err(ChartError::InvalidThresholds(_))));
}

#[test]
fn interior_boundaries_skip_the_outer_limits() {
    let boundaries: Vec<f64> = rt_zones().interior_boundaries().collect();
    assert_eq!(boundaries, vec![0.9, 1.1]);
}
