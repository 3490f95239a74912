//! Every recorded value stays within its critical bounds.

use crate::catalogue::sample_pod;
use crate::e2e_tests::helpers::{assert_within_critical, run};
use crate::sensors::MotionProfile;
use crate::simulation::RunOptions;

#[test]
fn test_sample_pod_model_mode_within_bounds() {
    let pod = sample_pod();
    for seed in [1, 2, 3] {
        let series = run(&pod, RunOptions::new(30_000).with_seed(seed));
        assert!(!series.is_empty());
        assert_within_critical(&pod, &series);
    }
}

#[test]
fn test_sample_pod_random_mode_within_bounds() {
    let pod = sample_pod();
    let series = run(
        &pod,
        RunOptions::new(10_000).with_random_mode(true).with_seed(99),
    );
    assert_within_critical(&pod, &series);
}

#[test]
fn test_every_tick_has_every_selected_channel() {
    let pod = sample_pod();
    let series = run(&pod, RunOptions::new(3000).with_seed(8));
    let expected = pod.continuous().count();
    for tick in &series {
        assert_eq!(tick.snapshot.len(), expected);
        assert!(tick.snapshot.get("brake_state").is_none());
    }
}

#[test]
fn test_sample_pod_acceleration_within_maximum() {
    let pod = sample_pod();
    let max_acceleration = MotionProfile::default().max_acceleration;
    for seed in [1, 2, 3] {
        let series = run(&pod, RunOptions::new(30_000).with_seed(seed));
        for channel in ["accelerometer_1", "accelerometer_2"] {
            for (time, a) in series.channel(channel) {
                assert!(
                    a.abs() <= max_acceleration,
                    "{channel} = {a} at {time} exceeds {max_acceleration} (seed {seed})"
                );
            }
        }
    }
}
