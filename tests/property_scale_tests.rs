use chrono::{DateTime, Utc};
use proptest::prelude::*;
use zone_chart::core::{LinearScale, TimeScale};

proptest! {
    #[test]
    fn linear_scale_round_trip_property(
        domain_start in -1_000.0f64..1_000.0,
        domain_span in 0.001f64..1_000.0,
        pixel_height in 1.0f64..4_000.0,
        value_factor in 0.0f64..1.0
    ) {
        let domain_end = domain_start + domain_span;
        let value = domain_start + value_factor * domain_span;
        let scale = LinearScale::new((domain_start, domain_end), (pixel_height, 0.0))
            .expect("valid scale");

        let px = scale.map(value);
        prop_assert!(px >= -1e-9 && px <= pixel_height + 1e-9);
        prop_assert!((scale.invert(px) - value).abs() <= 1e-7);
    }

    #[test]
    fn larger_values_sit_higher_on_an_inverted_axis(
        a in -100.0f64..100.0,
        b in -100.0f64..100.0
    ) {
        let scale = LinearScale::new((-100.0, 100.0), (400.0, 0.0)).expect("valid scale");
        if a < b {
            prop_assert!(scale.map(a) >= scale.map(b));
        }
    }

    #[test]
    fn time_scale_round_trip_stays_within_a_millisecond(
        start_ms in 1_500_000_000_000i64..1_700_000_000_000,
        span_ms in 60_000i64..40_000_000_000,
        plot_width in 1.0f64..4_000.0,
        offset_factor in 0.0f64..1.0
    ) {
        let start = DateTime::<Utc>::from_timestamp_millis(start_ms).expect("valid start");
        let end = DateTime::<Utc>::from_timestamp_millis(start_ms + span_ms).expect("valid end");
        let offset = (span_ms as f64 * offset_factor) as i64;
        let time = DateTime::<Utc>::from_timestamp_millis(start_ms + offset).expect("valid time");
        let scale = TimeScale::new((start, end), (0.0, plot_width)).expect("valid scale");

        let recovered = scale.invert(scale.map(time)).expect("invert");
        let drift = (recovered - time).num_milliseconds().abs();
        prop_assert!(drift <= 1, "drift {drift} ms for {time}");
    }
}
