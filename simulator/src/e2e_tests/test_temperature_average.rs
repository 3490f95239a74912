//! The average thermistor channel tracks the individual thermistors.

use crate::catalogue::{Catalogue, Measurement};
use crate::e2e_tests::helpers::{limits, run};
use crate::simulation::RunOptions;

fn catalogue(rms_noise: f64) -> Catalogue {
    let mut catalogue = Catalogue::new();
    for name in ["thermistor_1", "thermistor_2", "thermistor_3"] {
        catalogue.insert(Measurement::continuous(
            name,
            "temperature",
            limits((20.0, 60.0), (0.0, 80.0)),
            1000,
            rms_noise,
        ));
    }
    catalogue.insert(Measurement::continuous(
        "thermistor_avg",
        "temperature",
        limits((20.0, 60.0), (0.0, 80.0)),
        1000,
        0.0,
    ));
    catalogue
}

#[test]
fn test_average_is_mean_of_thermistors() {
    let series = run(&catalogue(0.5), RunOptions::new(10_000).with_seed(17));
    assert_eq!(series.len(), 10);
    for tick in &series {
        let mean = tick
            .snapshot
            .mean_of(["thermistor_1", "thermistor_2", "thermistor_3"])
            .unwrap();
        let avg = tick.snapshot.get("thermistor_avg").unwrap();
        assert!((avg - mean).abs() < 1e-9, "avg {avg} != mean {mean} at {}", tick.time);
    }
}

#[test]
fn test_noise_free_thermistors_hold_ambient() {
    let series = run(&catalogue(0.0), RunOptions::new(5000).with_seed(17));
    for tick in &series {
        for (_, value) in tick.snapshot.iter() {
            assert!((value - 25.0).abs() < 1e-9);
        }
    }
}
