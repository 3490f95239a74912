//! Common helpers for end-to-end tests.

use crate::catalogue::{Bounds, Catalogue, Limits};
use crate::series::RecordedSeries;
use crate::simulation::{RunOptions, Simulation};

/// Limits with the given normal and critical ranges.
#[must_use]
pub const fn limits(normal: (f64, f64), critical: (f64, f64)) -> Limits {
    Limits::new(
        Bounds::new(normal.0, normal.1),
        Bounds::new(critical.0, critical.1),
    )
}

/// Build and run a simulation, panicking with the error if construction fails.
#[must_use]
pub fn run(catalogue: &Catalogue, options: RunOptions) -> RecordedSeries {
    match Simulation::new(catalogue, options) {
        Ok(simulation) => simulation.run(),
        Err(e) => panic!("simulation failed to build: {e}"),
    }
}

/// Assert that every recorded value lies within its channel's critical bounds.
pub fn assert_within_critical(catalogue: &Catalogue, series: &RecordedSeries) {
    for tick in series {
        for (channel, value) in tick.snapshot.iter() {
            let measurement = catalogue
                .get(channel)
                .unwrap_or_else(|| panic!("recorded unknown channel '{channel}'"));
            let critical = measurement
                .limits
                .unwrap_or_else(|| panic!("'{channel}' has no limits"))
                .critical;
            assert!(
                critical.contains(value),
                "{channel} = {value} at {} is outside {critical:?}",
                tick.time
            );
        }
    }
}

/// Recorded timestamps in milliseconds.
#[must_use]
pub fn times(series: &RecordedSeries) -> Vec<u64> {
    series.iter().map(|tick| tick.time.as_millis()).collect()
}
