//! Each sensor type fires once per elapsed sampling period.

use crate::catalogue::sample_pod;
use crate::e2e_tests::helpers::run;
use crate::simulation::RunOptions;

#[test]
fn test_firings_are_floor_of_duration_over_period() {
    let pod = sample_pod();
    for duration in [0, 99, 1000, 2100, 7777] {
        for random_mode in [false, true] {
            let series = run(
                &pod,
                RunOptions::new(duration)
                    .with_random_mode(random_mode)
                    .with_seed(4),
            );
            for group in pod.groups(None) {
                assert_eq!(
                    series.firings(group.sensor_type()) as u64,
                    duration / group.sampling_period_ms(),
                    "{} over {duration}ms",
                    group.sensor_type()
                );
            }
        }
    }
}

#[test]
fn test_timestamps_strictly_increase() {
    let series = run(&sample_pod(), RunOptions::new(5000).with_seed(4));
    assert!(series.ticks().windows(2).all(|pair| pair[0].time < pair[1].time));
}

#[test]
fn test_shared_due_time_records_one_tick() {
    // motion (500) and temperature (1000) are both due at every whole second
    let series = run(&sample_pod(), RunOptions::new(2000).with_seed(4));
    let at_1000 = series
        .iter()
        .filter(|tick| tick.time.as_millis() == 1000)
        .collect::<Vec<_>>();
    assert_eq!(at_1000.len(), 1);
    assert!(at_1000[0].fired("motion"));
    assert!(at_1000[0].fired("temperature"));
}
