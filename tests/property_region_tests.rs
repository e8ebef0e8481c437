use proptest::prelude::*;
use zone_chart::core::{Color, ThresholdSet, Zone, compute_regions};

fn four_zones() -> ThresholdSet {
    let color = Color::rgb(0.5, 0.5, 0.5);
    ThresholdSet::new(vec![
        Zone::new("A", 0.0, 1.0, color),
        Zone::new("B", 1.0, 2.0, color),
        Zone::new("C", 2.0, 4.0, color),
        Zone::new("D", 4.0, f64::INFINITY, color),
    ])
    .expect("valid zones")
}

proptest! {
    #[test]
    fn regions_tile_the_visible_range(min in -3.0f64..8.0, span in 0.001f64..10.0) {
        let max = min + span;
        let zones = four_zones();
        let regions = compute_regions(min, max, &zones);

        prop_assert!(!regions.is_empty());
        prop_assert_eq!(regions[0].value_from, min);
        prop_assert_eq!(regions[regions.len() - 1].value_to, max);
        for pair in regions.windows(2) {
            prop_assert_eq!(pair[0].value_to, pair[1].value_from);
        }
        for region in &regions {
            prop_assert!(region.value_from < region.value_to);
            let mid = (region.value_from + region.value_to) / 2.0;
            prop_assert_eq!(&zones.classify(mid).name, &region.name);
        }
    }
}
