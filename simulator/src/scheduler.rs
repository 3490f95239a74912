//! Multi-rate scheduler.
//!
//! Every sensor type runs on its own clock. A clock's first firing is one
//! sampling period into the run, and each firing pushes it forward by
//! another period. The scheduler repeatedly takes the earliest due time and
//! fires every clock due at that instant together, so sensor types sharing a
//! due time are never ordered against each other.
//!
//! Due times sit in a `BinaryHeap` keyed by `(due, clock index)`, reversed
//! into a min-heap. The clock index only makes the heap order total; a tick
//! reports its due clocks in ascending index order regardless of how they
//! were declared.
//!
//! A clock whose next due time would pass `u64::MAX` is retired after its
//! last firing.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::{SimulationError, SimulationResult};
use crate::time::SimTime;

/// Clock state for one sensor type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    sensor_type: String,
    period_ms: u64,
    next_due: SimTime,
    fired: u64,
    retired: bool,
}

impl Clock {
    #[must_use]
    pub fn sensor_type(&self) -> &str {
        &self.sensor_type
    }

    #[must_use]
    pub const fn period_ms(&self) -> u64 {
        self.period_ms
    }

    #[must_use]
    pub const fn next_due(&self) -> SimTime {
        self.next_due
    }

    /// How many times this clock has fired.
    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }

    /// Whether the clock ran out of representable time and will not fire
    /// again.
    #[must_use]
    pub const fn is_retired(&self) -> bool {
        self.retired
    }
}

/// One firing instant: the time and the clocks due at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub time: SimTime,
    /// Indices of the due clocks, ascending.
    pub due: Vec<usize>,
}

/// Drives the simulation clock up to a fixed horizon.
#[derive(Debug, Clone)]
pub struct Scheduler {
    clocks: Vec<Clock>,
    queue: BinaryHeap<Reverse<(SimTime, usize)>>,
    horizon: SimTime,
}

impl Scheduler {
    /// Create a scheduler for the given `(sensor type, period)` clocks that
    /// fires nothing after `horizon`.
    ///
    /// # Errors
    ///
    /// Returns `ZeroSamplingPeriod` if any clock has a zero period; such a
    /// clock would never let time advance.
    pub fn new(
        periods: impl IntoIterator<Item = (String, u64)>,
        horizon: SimTime,
    ) -> SimulationResult<Self> {
        let mut clocks = Vec::new();
        let mut queue = BinaryHeap::new();
        for (index, (sensor_type, period_ms)) in periods.into_iter().enumerate() {
            if period_ms == 0 {
                return Err(SimulationError::ZeroSamplingPeriod { sensor_type });
            }
            let next_due = SimTime::from_millis(period_ms);
            queue.push(Reverse((next_due, index)));
            clocks.push(Clock {
                sensor_type,
                period_ms,
                next_due,
                fired: 0,
                retired: false,
            });
        }
        Ok(Self {
            clocks,
            queue,
            horizon,
        })
    }

    /// Fire the next batch of due clocks.
    ///
    /// Returns `None` once the earliest due time lies beyond the horizon.
    pub fn next_tick(&mut self) -> Option<Tick> {
        let Reverse((time, _)) = *self.queue.peek()?;
        if time > self.horizon {
            return None;
        }

        let mut due = Vec::new();
        while let Some(&Reverse((next, index))) = self.queue.peek() {
            if next != time {
                break;
            }
            self.queue.pop();
            due.push(index);
        }
        due.sort_unstable();

        for &index in &due {
            let clock = &mut self.clocks[index];
            clock.fired += 1;
            let Some(next_due) = clock.next_due.advance(clock.period_ms) else {
                tracing::debug!("clock '{}' retired at {}", clock.sensor_type, time);
                clock.retired = true;
                continue;
            };
            clock.next_due = next_due;
            self.queue.push(Reverse((next_due, index)));
        }

        Some(Tick { time, due })
    }

    #[must_use]
    pub fn clocks(&self) -> &[Clock] {
        &self.clocks
    }

    /// Whether no clock will fire again before the horizon.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.queue
            .peek()
            .is_none_or(|Reverse((time, _))| *time > self.horizon)
    }
}
