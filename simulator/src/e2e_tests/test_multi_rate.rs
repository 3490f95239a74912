//! Two sensor types on different clocks share one timeline.

use crate::catalogue::{Catalogue, Measurement};
use crate::e2e_tests::helpers::{limits, run, times};
use crate::simulation::{RunOptions, Simulation};

fn catalogue() -> Catalogue {
    Catalogue::new()
        .with(Measurement::continuous(
            "pressure_front_pull",
            "pressure",
            limits((0.5, 2.0), (0.0, 3.0)),
            500,
            0.02,
        ))
        .with(Measurement::continuous(
            "hall_effect_1",
            "hall_effect",
            limits((-50.0, 50.0), (-100.0, 100.0)),
            700,
            0.5,
        ))
}

#[test]
fn test_merged_timeline() {
    let series = run(&catalogue(), RunOptions::new(2000).with_seed(21));

    assert_eq!(times(&series), vec![500, 700, 1000, 1400, 1500, 2000]);
    let pressure: Vec<u64> = series
        .firing_times("pressure")
        .iter()
        .map(|t| t.as_millis())
        .collect();
    let hall: Vec<u64> = series
        .firing_times("hall_effect")
        .iter()
        .map(|t| t.as_millis())
        .collect();
    assert_eq!(pressure, vec![500, 1000, 1500, 2000]);
    assert_eq!(hall, vec![700, 1400]);
}

#[test]
fn test_unfired_type_is_carried_forward() {
    let catalogue = catalogue();
    let sim = Simulation::new(&catalogue, RunOptions::new(2000).with_seed(21)).unwrap();
    let initial_hall = sim.initial_snapshot().get("hall_effect_1");
    let series = sim.run();
    let ticks = series.ticks();

    // 500: only pressure fired, hall effect still holds its initial value
    assert_eq!(ticks[0].snapshot.get("hall_effect_1"), initial_hall);
    // 1000 and 1500 carry the 700 reading, 2000 carries the 1400 reading
    let hall_at_700 = ticks[1].snapshot.get("hall_effect_1");
    assert_eq!(ticks[2].snapshot.get("hall_effect_1"), hall_at_700);
    let hall_at_1400 = ticks[3].snapshot.get("hall_effect_1");
    assert_eq!(ticks[4].snapshot.get("hall_effect_1"), hall_at_1400);
    assert_eq!(ticks[5].snapshot.get("hall_effect_1"), hall_at_1400);
    // pressure is carried across the 700 and 1400 ticks
    assert_eq!(
        ticks[1].snapshot.get("pressure_front_pull"),
        ticks[0].snapshot.get("pressure_front_pull")
    );
    assert_eq!(
        ticks[3].snapshot.get("pressure_front_pull"),
        ticks[2].snapshot.get("pressure_front_pull")
    );

    for tick in &series {
        assert_eq!(tick.snapshot.len(), 2, "snapshot at {} incomplete", tick.time);
    }
}
