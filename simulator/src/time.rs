//! Simulated time for a single run.
//!
//! Time never comes from the system clock. It only moves when the scheduler
//! fires the next batch of due sensor types, which keeps runs reproducible.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Milliseconds of simulated time since the start of a run.
///
/// # Example
///
/// ```
/// use simulator::SimTime;
///
/// let t = SimTime::from_millis(1500);
/// assert_eq!(t.as_millis(), 1500);
/// assert!((t.as_secs_f64() - 1.5).abs() < f64::EPSILON);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct SimTime(u64);

impl SimTime {
    /// The start of every run.
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time in seconds, the unit the motion model integrates in.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Run lengths stay far below 2^52 ms
    pub const fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Advance by `ms` milliseconds, or `None` past `u64::MAX`.
    #[must_use]
    pub const fn advance(self, ms: u64) -> Option<Self> {
        match self.0.checked_add(ms) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
