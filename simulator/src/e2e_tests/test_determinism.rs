//! Runs with the same seed produce identical series.

// Tests compare cloned runs and ticks
#![allow(clippy::disallowed_methods)]

use crate::catalogue::sample_pod;
use crate::e2e_tests::helpers::run;
use crate::simulation::{RunOptions, run_simulation};

#[test]
fn test_same_seed_same_series() {
    let pod = sample_pod();
    for random_mode in [false, true] {
        let options = RunOptions::new(5000)
            .with_random_mode(random_mode)
            .with_seed(1234);
        let first = run(&pod, options.clone());
        let second = run(&pod, options);
        assert_eq!(first, second);
        assert_eq!(first.checksum(), second.checksum());
    }
}

#[test]
fn test_different_seed_different_series() {
    let pod = sample_pod();
    let first = run_simulation(&pod, 5000, false, None, 1).unwrap();
    let second = run_simulation(&pod, 5000, false, None, 2).unwrap();
    assert_eq!(first.len(), second.len());
    assert_ne!(first.checksum(), second.checksum());
}

#[test]
fn test_catalogue_is_reusable_across_runs() {
    let pod = sample_pod();
    let before = pod.clone();
    let _ = run(&pod, RunOptions::new(2000).with_seed(1));
    let _ = run(&pod, RunOptions::new(2000).with_seed(1).with_random_mode(true));
    assert_eq!(pod, before);
}
