//! Ticks are handed to a sink as they are recorded.

// Tests compare cloned runs and ticks
#![allow(clippy::disallowed_methods)]

use std::sync::Mutex;

use crate::catalogue::sample_pod;
use crate::series::RecordedTick;
use crate::simulation::{RunOptions, Simulation};
use crate::sink::{BroadcastSink, ReadingSink, SinkError};

/// Records every tick it is given.
#[derive(Default)]
struct CollectingSink {
    ticks: Mutex<Vec<RecordedTick>>,
}

impl ReadingSink for CollectingSink {
    fn publish(&self, tick: &RecordedTick) -> Result<(), SinkError> {
        self.ticks.lock().unwrap().push(tick.clone());
        Ok(())
    }
}

/// Rejects every tick.
struct RejectingSink;

impl ReadingSink for RejectingSink {
    fn publish(&self, _tick: &RecordedTick) -> Result<(), SinkError> {
        Err(SinkError::Rejected("broker unavailable".to_string()))
    }
}

#[test]
fn test_sink_sees_every_tick_in_order() {
    let pod = sample_pod();
    let sink = CollectingSink::default();
    let series = Simulation::new(&pod, RunOptions::new(3000).with_seed(2))
        .unwrap()
        .run_with_sink(&sink);

    let delivered = sink.ticks.into_inner().unwrap();
    assert_eq!(delivered.as_slice(), series.ticks());
}

#[test]
fn test_failing_sink_does_not_stop_run() {
    let pod = sample_pod();
    let options = RunOptions::new(3000).with_seed(2);
    let with_sink = Simulation::new(&pod, options.clone())
        .unwrap()
        .run_with_sink(&RejectingSink);
    let without_sink = Simulation::new(&pod, options).unwrap().run();
    assert_eq!(with_sink, without_sink);
}

#[test]
fn test_broadcast_sink_across_threads() {
    let pod = sample_pod();
    let (sink, mut receiver) = BroadcastSink::new(1024);
    let simulation = Simulation::new(&pod, RunOptions::new(2000).with_seed(2)).unwrap();

    let series = std::thread::spawn(move || simulation.run_with_sink(&sink))
        .join()
        .unwrap();

    let mut received = Vec::new();
    while let Ok(tick) = receiver.try_recv() {
        received.push(tick);
    }
    assert_eq!(received.as_slice(), series.ticks());
}

#[test]
fn test_broadcast_sink_without_receivers_still_records() {
    let pod = sample_pod();
    let (sink, receiver) = BroadcastSink::new(4);
    drop(receiver);
    let series = Simulation::new(&pod, RunOptions::new(1000).with_seed(2))
        .unwrap()
        .run_with_sink(&sink);
    assert!(!series.is_empty());
}
