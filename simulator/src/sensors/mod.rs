//! Per-sensor-type update logic.
//!
//! Each sensor type in the catalogue is driven by one [`SensorModel`]. The
//! model is a tagged variant picked from the sensor type name:
//!
//! - `motion` uses [`Motion`]: acceleration, velocity and displacement are
//!   derived from each other.
//! - `temperature` uses [`Temperature`]: thermistors drift and an average is
//!   reported.
//! - anything else uses [`Independent`]: every channel is sampled on its own.
//!
//! Every variant follows the same contract: read the pre-tick snapshot, never
//! modify it, and return fresh values for exactly the channels of its type.

// Channel metadata is copied into each run's models
#![allow(clippy::disallowed_methods)]

mod independent;
mod initial;
mod motion;
mod temperature;

use rand::Rng;

use crate::catalogue::{Bounds, Limits, Measurement, SensorGroup};
use crate::error::SimulationResult;
use crate::noise::NoiseModel;
use crate::snapshot::{Readings, Snapshot};
use crate::time::SimTime;

pub use independent::Independent;
pub use initial::{InitialReport, initial_readings, initial_value};
pub use motion::{Motion, MotionProfile, MotionState};
pub use temperature::Temperature;

/// A validated continuous channel, ready to simulate.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub limits: Limits,
    pub rms_noise: f64,
}

impl Channel {
    /// Validate a catalogue measurement.
    ///
    /// # Errors
    ///
    /// Fails if the measurement is not continuous or its limits are missing
    /// or inverted.
    pub fn from_measurement(measurement: &Measurement) -> SimulationResult<Self> {
        Ok(Self {
            name: measurement.name.clone(),
            limits: measurement.validated_limits()?,
            rms_noise: measurement.rms_noise,
        })
    }

    #[must_use]
    pub const fn critical(&self) -> &Bounds {
        &self.limits.critical
    }

    #[must_use]
    pub fn base_key(&self) -> &str {
        crate::catalogue::base_key(&self.name)
    }

    #[must_use]
    pub fn is_average(&self) -> bool {
        self.name.ends_with("avg")
    }
}

/// Validate every channel of a group.
///
/// # Errors
///
/// Returns the first channel validation failure.
pub fn channels_of(group: &SensorGroup) -> SimulationResult<Vec<Channel>> {
    group.channels().iter().map(Channel::from_measurement).collect()
}

/// Which update logic a sensor type uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Motion,
    Temperature,
    Independent,
}

impl ModelKind {
    #[must_use]
    pub fn for_sensor_type(sensor_type: &str) -> Self {
        match sensor_type {
            "motion" => Self::Motion,
            "temperature" => Self::Temperature,
            _ => Self::Independent,
        }
    }
}

/// Update logic for one sensor type.
#[derive(Debug, Clone)]
pub enum SensorModel {
    Motion(Motion),
    Temperature(Temperature),
    Independent(Independent),
}

impl SensorModel {
    /// Build the model for a sensor type.
    ///
    /// `initial` holds the type's starting readings; models that keep an
    /// internal state seed it from there.
    #[must_use]
    pub fn new(
        kind: ModelKind,
        sampling_period_ms: u64,
        channels: Vec<Channel>,
        initial: &Readings,
        profile: &MotionProfile,
    ) -> Self {
        match kind {
            ModelKind::Motion => Self::Motion(Motion::new(
                channels,
                initial,
                SimTime::from_millis(sampling_period_ms),
                *profile,
            )),
            ModelKind::Temperature => Self::Temperature(Temperature::new(channels, initial)),
            ModelKind::Independent => Self::Independent(Independent::new(channels)),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::Motion(_) => ModelKind::Motion,
            Self::Temperature(_) => ModelKind::Temperature,
            Self::Independent(_) => ModelKind::Independent,
        }
    }

    /// Produce the next readings for this sensor type.
    ///
    /// `elapsed` is the simulated time of the tick since the run started.
    pub fn update<R: Rng>(
        &mut self,
        snapshot: &Snapshot,
        elapsed: SimTime,
        noise: &mut NoiseModel<R>,
    ) -> Readings {
        match self {
            Self::Motion(motion) => motion.update(snapshot, elapsed, noise),
            Self::Temperature(temperature) => temperature.update(snapshot, noise),
            Self::Independent(independent) => independent.update(noise),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::Catalogue;

    fn channel(name: &str, low: f64, high: f64) -> Channel {
        Channel {
            name: name.to_string(),
            limits: Limits::new(Bounds::new(low, high), Bounds::new(low, high)),
            rms_noise: 0.0,
        }
    }

    #[test]
    fn test_model_kind_for_sensor_type() {
        assert_eq!(ModelKind::for_sensor_type("motion"), ModelKind::Motion);
        assert_eq!(ModelKind::for_sensor_type("temperature"), ModelKind::Temperature);
        assert_eq!(ModelKind::for_sensor_type("pressure"), ModelKind::Independent);
        assert_eq!(ModelKind::for_sensor_type("levitation"), ModelKind::Independent);
    }

    #[test]
    fn test_sensor_model_returns_only_its_channels() {
        let channels = vec![channel("pressure_1", 0.0, 5.0), channel("pressure_2", 0.0, 5.0)];
        let mut model = SensorModel::new(
            ModelKind::Independent,
            100,
            channels,
            &Readings::new(),
            &MotionProfile::default(),
        );
        let snapshot: Snapshot = [
            ("pressure_1".to_string(), 1.0),
            ("pressure_2".to_string(), 1.0),
            ("thermistor_1".to_string(), 25.0),
        ]
        .into_iter()
        .collect();
        let before = snapshot.clone();
        let mut noise = NoiseModel::seeded(5);

        let readings = model.update(&snapshot, SimTime::from_millis(100), &mut noise);

        assert_eq!(model.kind(), ModelKind::Independent);
        assert_eq!(
            readings.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["pressure_1", "pressure_2"]
        );
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_channels_of_group_propagates_invalid_limits() {
        let catalogue = Catalogue::new().with(Measurement::continuous(
            "pressure_1",
            "pressure",
            Limits::new(Bounds::new(0.0, 1.0), Bounds::new(5.0, 1.0)),
            100,
            0.0,
        ));
        let groups = catalogue.groups(None);
        assert!(channels_of(&groups[0]).is_err());
    }
}
