use std::time::{Duration, Instant};

use zone_chart::core::{Bounds, ScaledPoint, SpatialIndex};

fn index_of(points: &[(f64, f64)]) -> SpatialIndex<usize> {
    let scaled = points
        .iter()
        .enumerate()
        .map(|(i, &(x, y))| ScaledPoint::new(x, y, i))
        .collect();
    SpatialIndex::build(scaled, Bounds::new(400.0, 300.0))
}

#[test]
fn empty_index_resolves_nothing() {
    let index = index_of(&[]);
    assert!(index.is_empty());
    assert_eq!(index.nearest(10.0, 10.0), None);
    assert!(index.cells().is_empty());
}

#[test]
fn single_point_wins_every_query() {
    let index = index_of(&[(200.0, 150.0)]);
    assert_eq!(index.nearest(0.0, 0.0), Some(&0));
    assert_eq!(index.nearest(399.0, 299.0), Some(&0));
    assert_eq!(index.nearest(-50.0, 1_000.0), Some(&0));
}

#[test]
fn query_resolves_to_the_closest_point() {
    let index = index_of(&[(50.0, 100.0), (150.0, 80.0), (250.0, 120.0), (350.0, 60.0)]);

    assert_eq!(index.nearest(60.0, 110.0), Some(&0));
    assert_eq!(index.nearest(140.0, 200.0), Some(&1));
    assert_eq!(index.nearest(260.0, 100.0), Some(&2));
    assert_eq!(index.nearest(399.0, 50.0), Some(&3));
}

#[test]
fn walk_reaches_points_far_from_the_x_neighbour() {
    // The site closest in x is far away vertically.
    let index = index_of(&[(100.0, 10.0), (102.0, 290.0), (300.0, 280.0)]);
    assert_eq!(index.nearest(101.0, 285.0), Some(&1));
    assert_eq!(index.nearest(200.0, 285.0), Some(&1));
    assert_eq!(index.nearest(260.0, 285.0), Some(&2));
}

#[test]
fn duplicate_sites_resolve_to_the_first_point() {
    let index = index_of(&[(10.0, 10.0), (120.0, 40.0), (120.0, 40.0), (300.0, 200.0)]);

    assert_eq!(index.len(), 4);
    assert_eq!(index.site_count(), 3);
    assert_eq!(index.nearest(121.0, 41.0), Some(&1));
    assert_eq!(index.cell_polygon(1), index.cell_polygon(2));
}

#[test]
fn non_finite_points_are_skipped() {
    let index = index_of(&[(f64::NAN, 10.0), (100.0, 100.0)]);
    assert_eq!(index.site_count(), 1);
    assert_eq!(index.nearest(0.0, 0.0), Some(&1));
    assert_eq!(index.cell_polygon(0), None);
    assert_eq!(index.nearest(f64::NAN, 0.0), None);
}

#[test]
fn cells_tile_the_bounds() {
    let points = [
        (40.0, 60.0),
        (120.0, 200.0),
        (220.0, 90.0),
        (330.0, 250.0),
        (380.0, 20.0),
    ];
    let index = index_of(&points);
    let cells = index.cells();
    assert_eq!(cells.len(), points.len());

    let total_area: f64 = cells.iter().map(|cell| polygon_area(&cell.polygon)).sum();
    assert!((total_area - 400.0 * 300.0).abs() <= 1e-6);

    for cell in &cells {
        let (x, y) = points[cell.point_index];
        assert!(contains(&cell.polygon, x, y));
    }
}

#[test]
fn dense_series_builds_quickly_and_matches_brute_force() {
    let bounds = Bounds::new(1_920.0, 1_080.0);
    let points: Vec<ScaledPoint<usize>> = (0..5_000)
        .map(|i| {
            let t = f64::from(i);
            ScaledPoint::new(t * 0.384, 540.0 + 400.0 * (t / 97.0).sin(), i as usize)
        })
        .collect();

    let started = Instant::now();
    let index = SpatialIndex::build(points.clone(), bounds);
    let elapsed = started.elapsed();
    assert!(
        elapsed < Duration::from_secs(5),
        "building 5k sites took {elapsed:?}"
    );

    for (qx, qy) in [(0.0, 0.0), (913.7, 402.5), (1_919.0, 1_079.0), (480.0, 900.0)] {
        let expected = points
            .iter()
            .min_by(|a, b| {
                let da = (a.x - qx).powi(2) + (a.y - qy).powi(2);
                let db = (b.x - qx).powi(2) + (b.y - qy).powi(2);
                da.total_cmp(&db)
            })
            .map(|point| point.data);
        assert_eq!(index.nearest(qx, qy).copied(), expected, "query ({qx}, {qy})");
    }
}

fn polygon_area(polygon: &[(f64, f64)]) -> f64 {
    let twice: f64 = polygon
        .iter()
        .zip(polygon.iter().cycle().skip(1))
        .map(|(a, b)| a.0 * b.1 - b.0 * a.1)
        .sum();
    twice.abs() / 2.0
}

fn contains(polygon: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
