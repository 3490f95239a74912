//! Restricting a run to an allow-list of channels.

use crate::catalogue::sample_pod;
use crate::e2e_tests::helpers::{run, times};
use crate::simulation::RunOptions;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_only_allowed_channels_are_recorded() {
    let series = run(
        &sample_pod(),
        RunOptions::new(2000)
            .with_seed(6)
            .with_channels(names(&["thermistor_1", "thermistor_avg", "power_line_resistance"])),
    );

    assert_eq!(times(&series), vec![700, 1000, 1400, 2000]);
    for tick in &series {
        let recorded: Vec<&str> = tick.snapshot.iter().map(|(name, _)| name).collect();
        assert_eq!(
            recorded,
            vec!["power_line_resistance", "thermistor_1", "thermistor_avg"]
        );
    }
    assert_eq!(series.firings("motion"), 0);
}

#[test]
fn test_unknown_and_enum_names_are_ignored() {
    let series = run(
        &sample_pod(),
        RunOptions::new(1000)
            .with_seed(6)
            .with_channels(names(&["velocity", "no_such_channel", "brake_state"])),
    );
    assert_eq!(times(&series), vec![500, 1000]);
    for tick in &series {
        assert_eq!(tick.snapshot.len(), 1);
        assert!(tick.snapshot.get("velocity").is_some());
    }
}

#[test]
fn test_empty_allow_list_records_nothing() {
    let series = run(
        &sample_pod(),
        RunOptions::new(5000).with_seed(6).with_channels(Vec::new()),
    );
    assert!(series.is_empty());
}
