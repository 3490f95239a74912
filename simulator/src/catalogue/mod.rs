//! Measurement catalogue.
//!
//! The catalogue describes every channel a pod exposes: its sensor type,
//! value format, limits, sampling period and noise RMS. It is read-only
//! input to a simulation run and may be shared by any number of runs.
//!
//! Loading the catalogue from external configuration is not handled here;
//! the types derive `serde` traits so a loader can produce them directly.
//!
//! # Invariants
//!
//! - Channel names are unique within a catalogue.
//! - For a valid continuous channel,
//!   `critical.low <= normal.low <= normal.high <= critical.high`.

// Grouping copies measurement metadata into each run
#![allow(clippy::disallowed_methods)]

mod sample;

use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};

pub use sample::sample_pod;

/// A closed `[low, high]` interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub low: f64,
    pub high: f64,
}

impl Bounds {
    #[must_use]
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Returns `true` if `value` lies within the bounds, inclusive.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Clamp `value` into the bounds.
    ///
    /// Callers must only clamp into validated bounds (`low <= high`).
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.low, self.high)
    }

    /// The overlap of two bounds, or `None` if they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let low = self.low.max(other.low);
        let high = self.high.min(other.high);
        (low <= high).then_some(Self { low, high })
    }

    fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low <= self.high
    }
}

/// Operating and critical limits of a continuous channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub normal: Bounds,
    pub critical: Bounds,
}

impl Limits {
    #[must_use]
    pub const fn new(normal: Bounds, critical: Bounds) -> Self {
        Self { normal, critical }
    }

    /// Whether the normal band sits inside the critical band.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.critical.low <= self.normal.low
            && self.normal.low <= self.normal.high
            && self.normal.high <= self.critical.high
    }
}

/// How a channel's values are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueFormat {
    /// A real-valued reading. The only format that is simulated.
    Continuous,
    /// A discrete state. Excluded from simulation.
    Enum,
}

/// Metadata for one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unique channel name, e.g. `accelerometer_1`.
    pub name: String,
    /// Physical category the channel belongs to, e.g. `motion`.
    pub sensor_type: String,
    pub format: ValueFormat,
    /// Required for continuous channels.
    pub limits: Option<Limits>,
    /// Interval between successive readings, in simulated milliseconds.
    pub sampling_period_ms: u64,
    /// Magnitude of the noise added to each reading.
    pub rms_noise: f64,
}

impl Measurement {
    /// A continuous channel.
    #[must_use]
    pub fn continuous(
        name: &str,
        sensor_type: &str,
        limits: Limits,
        sampling_period_ms: u64,
        rms_noise: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            sensor_type: sensor_type.to_string(),
            format: ValueFormat::Continuous,
            limits: Some(limits),
            sampling_period_ms,
            rms_noise,
        }
    }

    /// An enum channel. These are carried in the catalogue but never simulated.
    #[must_use]
    pub fn enumeration(name: &str, sensor_type: &str, sampling_period_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            sensor_type: sensor_type.to_string(),
            format: ValueFormat::Enum,
            limits: None,
            sampling_period_ms,
            rms_noise: 0.0,
        }
    }

    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.format == ValueFormat::Continuous
    }

    /// Channel name with its numeric suffix removed. See [`base_key`].
    #[must_use]
    pub fn base_key(&self) -> &str {
        base_key(&self.name)
    }

    /// Whether this is a derived average channel (e.g. `thermistor_avg`).
    #[must_use]
    pub fn is_average(&self) -> bool {
        self.name.ends_with("avg")
    }

    /// Validated limits of a continuous channel.
    ///
    /// # Errors
    ///
    /// - `UnsupportedFormat` for enum channels.
    /// - `MissingLimits` if the channel has no limits.
    /// - `InvalidLimits` if the critical bounds are inverted or not finite.
    pub fn validated_limits(&self) -> SimulationResult<Limits> {
        if !self.is_continuous() {
            return Err(SimulationError::UnsupportedFormat {
                channel: self.name.clone(),
            });
        }
        let limits = self.limits.ok_or_else(|| SimulationError::MissingLimits {
            channel: self.name.clone(),
        })?;
        if !limits.critical.is_valid() {
            return Err(SimulationError::InvalidLimits {
                channel: self.name.clone(),
                low: limits.critical.low,
                high: limits.critical.high,
            });
        }
        if !limits.is_nested() {
            tracing::warn!(
                "channel '{}' has normal limits {:?} outside critical limits {:?}",
                self.name,
                limits.normal,
                limits.critical
            );
        }
        Ok(limits)
    }
}

/// Strip the trailing `_<suffix>` segment from a channel name when that
/// segment ends in a digit.
///
/// ```
/// use simulator::catalogue::base_key;
///
/// assert_eq!(base_key("accelerometer_1"), "accelerometer");
/// assert_eq!(base_key("levitation_height_12"), "levitation_height");
/// assert_eq!(base_key("thermistor_avg"), "thermistor_avg");
/// assert_eq!(base_key("velocity"), "velocity");
/// ```
#[must_use]
pub fn base_key(name: &str) -> &str {
    if !name.ends_with(|c: char| c.is_ascii_digit()) {
        return name;
    }
    name.rsplit_once('_').map_or(name, |(prefix, _)| prefix)
}

/// The set of channels a pod exposes, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogue {
    measurements: Vec<Measurement>,
}

impl Catalogue {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            measurements: Vec::new(),
        }
    }

    /// Add a measurement, builder style.
    #[must_use]
    pub fn with(mut self, measurement: Measurement) -> Self {
        self.insert(measurement);
        self
    }

    /// Insert a measurement, returning the one it replaced, if any.
    ///
    /// A replaced measurement keeps its original declaration position.
    pub fn insert(&mut self, measurement: Measurement) -> Option<Measurement> {
        if let Some(existing) = self
            .measurements
            .iter_mut()
            .find(|m| m.name == measurement.name)
        {
            return Some(std::mem::replace(existing, measurement));
        }
        self.measurements.push(measurement);
        None
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter()
    }

    /// Channels eligible for simulation.
    pub fn continuous(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter().filter(|m| m.is_continuous())
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.measurements.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Group the continuous channels by sensor type, optionally restricted
    /// to an allow-list of channel names.
    ///
    /// Groups appear in the order their first channel was declared.
    /// Allow-list entries that name unknown or enum channels are logged and
    /// ignored.
    #[must_use]
    pub fn groups(&self, allow: Option<&[String]>) -> Vec<SensorGroup> {
        if let Some(allow) = allow {
            for name in allow {
                match self.get(name) {
                    None => tracing::warn!("allow-list names unknown channel '{name}'"),
                    Some(m) if !m.is_continuous() => {
                        tracing::warn!("allow-list names enum channel '{name}', ignoring");
                    }
                    Some(_) => {}
                }
            }
        }

        let mut groups: Vec<SensorGroup> = Vec::new();
        let selected = self
            .continuous()
            .filter(|m| allow.is_none_or(|allow| allow.iter().any(|name| *name == m.name)));
        for measurement in selected {
            match groups
                .iter_mut()
                .find(|g| g.sensor_type == measurement.sensor_type)
            {
                Some(group) => group.push(measurement.clone()),
                None => groups.push(SensorGroup::new(measurement.clone())),
            }
        }
        groups
    }
}

/// Channels sharing one sensor type, simulated on one clock.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorGroup {
    sensor_type: String,
    sampling_period_ms: u64,
    channels: Vec<Measurement>,
}

impl SensorGroup {
    /// Start a group. The first channel fixes the group's sampling period.
    fn new(first: Measurement) -> Self {
        Self {
            sensor_type: first.sensor_type.clone(),
            sampling_period_ms: first.sampling_period_ms,
            channels: vec![first],
        }
    }

    fn push(&mut self, measurement: Measurement) {
        if measurement.sampling_period_ms != self.sampling_period_ms {
            tracing::warn!(
                "channel '{}' samples every {}ms but sensor type '{}' runs every {}ms; using the group period",
                measurement.name,
                measurement.sampling_period_ms,
                self.sensor_type,
                self.sampling_period_ms
            );
        }
        self.channels.push(measurement);
    }

    #[must_use]
    pub fn sensor_type(&self) -> &str {
        &self.sensor_type
    }

    #[must_use]
    pub const fn sampling_period_ms(&self) -> u64 {
        self.sampling_period_ms
    }

    #[must_use]
    pub fn channels(&self) -> &[Measurement] {
        &self.channels
    }

    /// Number of physical sensors in the group. Derived average channels
    /// are not counted.
    #[must_use]
    pub fn quantity(&self) -> usize {
        self.channels.iter().filter(|m| !m.is_average()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(low: f64, high: f64) -> Limits {
        Limits::new(Bounds::new(low, high), Bounds::new(low, high))
    }

    #[test]
    fn test_base_key_strips_numeric_suffix() {
        assert_eq!(base_key("accelerometer_1"), "accelerometer");
        assert_eq!(base_key("hall_effect_2"), "hall_effect");
        assert_eq!(base_key("pressure_front_pull_reservoir"), "pressure_front_pull_reservoir");
        assert_eq!(base_key("sensor_a1"), "sensor");
        assert_eq!(base_key("7"), "7");
    }

    #[test]
    fn test_bounds_contains_and_clamp() {
        let bounds = Bounds::new(0.0, 50.0);
        assert!(bounds.contains(0.0));
        assert!(bounds.contains(50.0));
        assert!(!bounds.contains(50.1));
        assert!((bounds.clamp(-3.0) - 0.0).abs() < f64::EPSILON);
        assert!((bounds.clamp(75.0) - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds_intersect() {
        let critical = Bounds::new(-10.0, 10.0);
        let envelope = Bounds::new(-5.0, 5.0);
        assert_eq!(critical.intersect(&envelope), Some(envelope));
        assert_eq!(
            Bounds::new(0.0, 8.0).intersect(&envelope),
            Some(Bounds::new(0.0, 5.0))
        );
        assert_eq!(Bounds::new(6.0, 8.0).intersect(&envelope), None);
    }

    #[test]
    fn test_validated_limits_rejects_inverted_bounds() {
        let m = Measurement::continuous(
            "pressure_1",
            "pressure",
            Limits::new(Bounds::new(1.0, 2.0), Bounds::new(10.0, 0.0)),
            100,
            0.0,
        );
        assert_eq!(
            m.validated_limits(),
            Err(SimulationError::InvalidLimits {
                channel: "pressure_1".to_string(),
                low: 10.0,
                high: 0.0,
            })
        );
    }

    #[test]
    fn test_validated_limits_rejects_missing_limits() {
        let mut m = Measurement::continuous("pressure_1", "pressure", limits(0.0, 1.0), 100, 0.0);
        m.limits = None;
        assert_eq!(
            m.validated_limits(),
            Err(SimulationError::MissingLimits {
                channel: "pressure_1".to_string()
            })
        );
    }

    #[test]
    fn test_validated_limits_rejects_nan() {
        let m = Measurement::continuous("p", "pressure", limits(f64::NAN, 1.0), 100, 0.0);
        assert!(matches!(
            m.validated_limits(),
            Err(SimulationError::InvalidLimits { .. })
        ));
    }

    #[test]
    fn test_enum_channel_is_unsupported() {
        let m = Measurement::enumeration("brake_state", "brakes", 100);
        assert!(!m.is_continuous());
        assert!(matches!(
            m.validated_limits(),
            Err(SimulationError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_insert_replaces_duplicate_names() {
        let mut catalogue = Catalogue::new();
        assert!(
            catalogue
                .insert(Measurement::continuous("v", "motion", limits(0.0, 1.0), 100, 0.0))
                .is_none()
        );
        let replaced =
            catalogue.insert(Measurement::continuous("v", "motion", limits(0.0, 9.0), 100, 0.0));
        assert!(replaced.is_some());
        assert_eq!(catalogue.len(), 1);
        assert_eq!(
            catalogue.get("v").and_then(|m| m.limits).map(|l| l.critical.high),
            Some(9.0)
        );
    }

    #[test]
    fn test_groups_by_sensor_type_in_declaration_order() {
        let catalogue = Catalogue::new()
            .with(Measurement::continuous("thermistor_1", "temperature", limits(0.0, 50.0), 1000, 0.0))
            .with(Measurement::continuous("velocity", "motion", limits(0.0, 50.0), 500, 0.0))
            .with(Measurement::continuous("thermistor_2", "temperature", limits(0.0, 50.0), 1000, 0.0))
            .with(Measurement::continuous("thermistor_avg", "temperature", limits(0.0, 50.0), 1000, 0.0))
            .with(Measurement::enumeration("brake_state", "motion", 500));

        let groups = catalogue.groups(None);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].sensor_type(), "temperature");
        assert_eq!(groups[0].channels().len(), 3);
        assert_eq!(groups[0].quantity(), 2);
        assert_eq!(groups[0].sampling_period_ms(), 1000);
        assert_eq!(groups[1].sensor_type(), "motion");
        assert_eq!(groups[1].channels().len(), 1);
    }

    #[test]
    fn test_groups_with_allow_list() {
        let catalogue = Catalogue::new()
            .with(Measurement::continuous("thermistor_1", "temperature", limits(0.0, 50.0), 1000, 0.0))
            .with(Measurement::continuous("pressure_1", "pressure", limits(0.0, 5.0), 200, 0.0));

        let allow = vec!["pressure_1".to_string(), "does_not_exist".to_string()];
        let groups = catalogue.groups(Some(&allow));
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].sensor_type(), "pressure");

        let none: Vec<String> = Vec::new();
        assert!(catalogue.groups(Some(&none)).is_empty());
    }

    #[test]
    fn test_limits_nesting() {
        let nested = Limits::new(Bounds::new(20.0, 30.0), Bounds::new(0.0, 50.0));
        let loose = Limits::new(Bounds::new(-5.0, 30.0), Bounds::new(0.0, 50.0));
        assert!(nested.is_nested());
        assert!(!loose.is_nested());
    }
}
