//! The first motion tick from rest.

// Tests compare cloned runs and ticks
#![allow(clippy::disallowed_methods)]

use crate::catalogue::{Catalogue, Measurement};
use crate::e2e_tests::helpers::{limits, run};
use crate::sensors::{MotionProfile, SensorModel};
use crate::simulation::{RunOptions, Simulation};
use crate::time::SimTime;

fn catalogue() -> Catalogue {
    Catalogue::new()
        .with(Measurement::continuous(
            "accelerometer_1",
            "motion",
            limits((-4.0, 4.0), (-10.0, 10.0)),
            500,
            0.0,
        ))
        .with(Measurement::continuous(
            "velocity_1",
            "motion",
            limits((0.0, 45.0), (0.0, 50.0)),
            500,
            0.0,
        ))
        .with(Measurement::continuous(
            "displacement_1",
            "motion",
            limits((0.0, 4000.0), (0.0, 5000.0)),
            500,
            0.0,
        ))
}

#[test]
fn test_initial_motion_values() {
    let sim = Simulation::new(&catalogue(), RunOptions::new(500)).unwrap();
    let initial = sim.initial_snapshot();
    assert_eq!(initial.get("velocity_1"), Some(5.0));
    assert_eq!(initial.get("accelerometer_1"), Some(0.0));
    assert_eq!(initial.get("displacement_1"), Some(0.0));
}

#[test]
fn test_first_tick_follows_euler_step() {
    let mut sim = Simulation::new(&catalogue(), RunOptions::new(500)).unwrap();
    let tick = sim.step().unwrap().clone();
    assert!(sim.step().is_none());

    assert_eq!(tick.time, SimTime::from_millis(500));
    // Target at 0.5s is far below 5 m/s, so the deceleration saturates
    let a = tick.snapshot.get("accelerometer_1").unwrap();
    let v = tick.snapshot.get("velocity_1").unwrap();
    let x = tick.snapshot.get("displacement_1").unwrap();
    assert!((a + 5.0).abs() < 1e-9, "a = {a}");
    assert!((v - 2.5).abs() < 1e-9, "v = {v}");
    assert!((x - 1.25).abs() < 1e-9, "x = {x}");

    match sim.model("motion") {
        Some(SensorModel::Motion(motion)) => assert!((motion.state().velocity - 2.5).abs() < 1e-9),
        other => panic!("expected a motion model, got {other:?}"),
    }
}

#[test]
fn test_acceleration_never_exceeds_maximum() {
    let profile = MotionProfile::default();
    let series = run(
        &catalogue(),
        RunOptions::new(60_000).with_seed(5),
    );
    assert_eq!(series.len(), 120);
    for (time, a) in series.channel("accelerometer_1") {
        assert!(
            a.abs() <= profile.max_acceleration + 1e-9,
            "|a| = {} at {time}",
            a.abs()
        );
    }
    let (_, last_velocity) = series.channel("velocity_1")[119];
    assert!((last_velocity - 47.5).abs() < 0.5, "v = {last_velocity}");
}
