//! A single thermistor sampled in random mode.

use crate::catalogue::{Catalogue, Measurement};
use crate::e2e_tests::helpers::{assert_within_critical, limits, run, times};
use crate::simulation::RunOptions;

fn catalogue() -> Catalogue {
    Catalogue::new().with(Measurement::continuous(
        "thermistor_1",
        "temperature",
        limits((20.0, 30.0), (0.0, 50.0)),
        1000,
        0.0,
    ))
}

#[test]
fn test_random_mode_three_ticks_within_bounds() {
    let catalogue = catalogue();
    let series = run(
        &catalogue,
        RunOptions::new(3000).with_random_mode(true).with_seed(11),
    );

    assert_eq!(times(&series), vec![1000, 2000, 3000]);
    assert_within_critical(&catalogue, &series);
    for tick in &series {
        assert_eq!(tick.snapshot.len(), 1);
        assert_eq!(tick.fired, vec!["temperature".to_string()]);
    }
}

#[test]
fn test_random_mode_values_vary_between_ticks() {
    let series = run(
        &catalogue(),
        RunOptions::new(10_000).with_random_mode(true).with_seed(3),
    );
    let values: Vec<f64> = series.channel("thermistor_1").iter().map(|(_, v)| *v).collect();
    assert_eq!(values.len(), 10);
    assert!(values.windows(2).any(|pair| pair[0].to_bits() != pair[1].to_bits()));
}
