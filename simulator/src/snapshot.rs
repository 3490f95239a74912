//! Reading snapshots and the per-run channel store.
//!
//! A [`Snapshot`] is an immutable value: once built it never changes, so a
//! snapshot recorded for one tick can never be disturbed by the next. New
//! readings produce a new snapshot through [`Snapshot::with_readings`].
//!
//! The [`ChannelStore`] holds the current snapshot of one run and only
//! supports whole-snapshot replacement.

// Snapshots are copied per tick by construction
#![allow(clippy::disallowed_methods)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Values produced by one sensor type for one tick, keyed by channel name.
pub type Readings = BTreeMap<String, f64>;

/// The value of every simulated channel at one instant.
///
/// Channels iterate in name order, which keeps serialized output stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    values: BTreeMap<String, f64>,
}

impl Snapshot {
    /// A snapshot holding exactly `values`.
    #[must_use]
    pub const fn new(values: BTreeMap<String, f64>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn get(&self, channel: &str) -> Option<f64> {
        self.values.get(channel).copied()
    }

    /// Mean of the named channels that are present, or `None` if none are.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Channel counts are tiny
    pub fn mean_of<'a>(&self, channels: impl IntoIterator<Item = &'a str>) -> Option<f64> {
        let (sum, count) = channels
            .into_iter()
            .filter_map(|channel| self.get(channel))
            .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A new snapshot with `readings` overlaid on this one's values.
    ///
    /// Channels absent from `readings` carry their current value forward.
    /// `self` is left untouched.
    #[must_use]
    pub fn with_readings<'a>(&self, readings: impl IntoIterator<Item = &'a Readings>) -> Self {
        let mut values = self.values.clone();
        for batch in readings {
            for (channel, value) in batch {
                values.insert(channel.clone(), *value);
            }
        }
        Self { values }
    }
}

impl FromIterator<(String, f64)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Holder of the current snapshot for one simulation run.
///
/// Owned by exactly one run. Readers borrow the snapshot; writers swap in a
/// complete replacement.
#[derive(Debug, Clone, Default)]
pub struct ChannelStore {
    current: Snapshot,
}

impl ChannelStore {
    #[must_use]
    pub const fn new(initial: Snapshot) -> Self {
        Self { current: initial }
    }

    #[must_use]
    pub const fn get(&self) -> &Snapshot {
        &self.current
    }

    /// Swap in `next`, returning the snapshot it replaced.
    pub fn replace(&mut self, next: Snapshot) -> Snapshot {
        std::mem::replace(&mut self.current, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, f64)]) -> Snapshot {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_string(), *value))
            .collect()
    }

    #[test]
    fn test_with_readings_leaves_original_untouched() {
        let before = snapshot(&[("a", 1.0), ("b", 2.0)]);
        let mut update = Readings::new();
        update.insert("a".to_string(), 10.0);

        let after = before.with_readings([&update]);

        assert_eq!(before.get("a"), Some(1.0));
        assert_eq!(after.get("a"), Some(10.0));
        assert_eq!(after.get("b"), Some(2.0));
    }

    #[test]
    fn test_with_readings_merges_several_batches() {
        let before = snapshot(&[("a", 1.0), ("b", 2.0), ("c", 3.0)]);
        let first: Readings = [("a".to_string(), 5.0)].into_iter().collect();
        let second: Readings = [("c".to_string(), 7.0)].into_iter().collect();

        let after = before.with_readings([&first, &second]);

        assert_eq!(after.get("a"), Some(5.0));
        assert_eq!(after.get("b"), Some(2.0));
        assert_eq!(after.get("c"), Some(7.0));
    }

    #[test]
    fn test_mean_of_present_channels() {
        let s = snapshot(&[("t1", 20.0), ("t2", 30.0)]);
        assert_eq!(s.mean_of(["t1", "t2", "missing"]), Some(25.0));
        assert_eq!(s.mean_of(["missing"]), None);
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let s = snapshot(&[("zeta", 1.0), ("alpha", 2.0), ("mid", 3.0)]);
        let names: Vec<&str> = s.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_store_replace_swaps_whole_snapshot() {
        let mut store = ChannelStore::new(snapshot(&[("a", 1.0)]));
        let held = store.get().clone();

        let previous = store.replace(snapshot(&[("a", 2.0), ("b", 3.0)]));

        assert_eq!(previous, held);
        assert_eq!(held.get("a"), Some(1.0));
        assert_eq!(store.get().get("a"), Some(2.0));
        assert_eq!(store.get().len(), 2);
    }
}
