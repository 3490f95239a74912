//! The recorded output of a simulation run.
//!
//! A [`RecordedSeries`] is append-only: ticks are added by the run in time
//! order and never modified afterwards. Each tick carries the full snapshot
//! after the tick, including values carried forward from sensor types that
//! did not fire.

use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;
use crate::time::SimTime;

/// The state of every channel after one scheduler tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedTick {
    pub time: SimTime,
    /// Sensor types that produced fresh readings at this tick.
    pub fired: Vec<String>,
    pub snapshot: Snapshot,
}

impl RecordedTick {
    /// Whether `sensor_type` fired at this tick.
    #[must_use]
    pub fn fired(&self, sensor_type: &str) -> bool {
        self.fired.iter().any(|fired| fired == sensor_type)
    }
}

/// Ordered history of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordedSeries {
    ticks: Vec<RecordedTick>,
}

impl RecordedSeries {
    #[must_use]
    pub const fn new() -> Self {
        Self { ticks: Vec::new() }
    }

    /// Append a tick. Ticks must arrive in non-decreasing time order.
    pub(crate) fn push(&mut self, tick: RecordedTick) {
        debug_assert!(
            self.ticks.last().is_none_or(|last| last.time <= tick.time),
            "ticks must be appended in time order"
        );
        self.ticks.push(tick);
    }

    #[must_use]
    pub fn ticks(&self) -> &[RecordedTick] {
        &self.ticks
    }

    #[must_use]
    pub fn last(&self) -> Option<&RecordedTick> {
        self.ticks.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordedTick> {
        self.ticks.iter()
    }

    /// `(timestamp, snapshot)` pairs in time order.
    pub fn timeline(&self) -> impl Iterator<Item = (SimTime, &Snapshot)> {
        self.ticks.iter().map(|tick| (tick.time, &tick.snapshot))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Number of ticks at which `sensor_type` fired.
    #[must_use]
    pub fn firings(&self, sensor_type: &str) -> usize {
        self.ticks.iter().filter(|tick| tick.fired(sensor_type)).count()
    }

    /// Times at which `sensor_type` fired.
    #[must_use]
    pub fn firing_times(&self, sensor_type: &str) -> Vec<SimTime> {
        self.ticks
            .iter()
            .filter(|tick| tick.fired(sensor_type))
            .map(|tick| tick.time)
            .collect()
    }

    /// Every recorded value of `channel`, with its timestamp.
    #[must_use]
    pub fn channel(&self, channel: &str) -> Vec<(SimTime, f64)> {
        self.ticks
            .iter()
            .filter_map(|tick| tick.snapshot.get(channel).map(|value| (tick.time, value)))
            .collect()
    }

    /// CRC32 over every timestamp, fired type, channel name and value bit
    /// pattern. Identical series produce identical checksums.
    #[must_use]
    pub fn checksum(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for tick in &self.ticks {
            hasher.update(&tick.time.as_millis().to_le_bytes());
            for sensor_type in &tick.fired {
                hasher.update(sensor_type.as_bytes());
                hasher.update(&[0]);
            }
            for (channel, value) in tick.snapshot.iter() {
                hasher.update(channel.as_bytes());
                hasher.update(&value.to_bits().to_le_bytes());
            }
        }
        hasher.finalize()
    }
}

impl<'a> IntoIterator for &'a RecordedSeries {
    type Item = &'a RecordedTick;
    type IntoIter = std::slice::Iter<'a, RecordedTick>;

    fn into_iter(self) -> Self::IntoIter {
        self.ticks.iter()
    }
}
