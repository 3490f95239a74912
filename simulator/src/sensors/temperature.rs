//! Temperature update logic.
//!
//! Thermistors drift from their previous reading by their noise amplitude.
//! The sensor type's temperature is the average of its thermistors, which
//! is also written to any average channel in the type.

use rand::Rng;

use super::Channel;
use crate::noise::NoiseModel;
use crate::snapshot::{Readings, Snapshot};

/// Update logic for the `temperature` sensor type.
#[derive(Debug, Clone)]
pub struct Temperature {
    thermistors: Vec<Channel>,
    averages: Vec<Channel>,
    /// Average of the thermistors at the start of the run.
    initial: f64,
    /// Average of the thermistors after the latest tick.
    average: f64,
}

impl Temperature {
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Channel counts are tiny
    pub fn new(channels: Vec<Channel>, initial: &Readings) -> Self {
        let (averages, thermistors): (Vec<Channel>, Vec<Channel>) =
            channels.into_iter().partition(Channel::is_average);
        let values: Vec<f64> = thermistors
            .iter()
            .filter_map(|c| initial.get(&c.name).copied())
            .collect();
        let average = if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        };
        Self {
            thermistors,
            averages,
            initial: average,
            average,
        }
    }

    /// Running average of the thermistors.
    #[must_use]
    pub const fn average(&self) -> f64 {
        self.average
    }

    /// Average of the thermistors when the run started.
    #[must_use]
    pub const fn initial_average(&self) -> f64 {
        self.initial
    }

    #[allow(clippy::cast_precision_loss)] // Channel counts are tiny
    pub fn update<R: Rng>(&mut self, snapshot: &Snapshot, noise: &mut NoiseModel<R>) -> Readings {
        let mut readings = Readings::new();
        let mut sum = 0.0;
        for channel in &self.thermistors {
            let previous = snapshot.get(&channel.name).unwrap_or(self.average);
            let value = noise.perturb(previous, channel.critical(), channel.rms_noise);
            sum += value;
            readings.insert(channel.name.clone(), value);
        }
        if !self.thermistors.is_empty() {
            self.average = sum / self.thermistors.len() as f64;
        }

        for channel in &self.averages {
            let value = noise.perturb(self.average, channel.critical(), channel.rms_noise);
            readings.insert(channel.name.clone(), value);
        }
        readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Bounds, Limits};

    fn channel(name: &str, rms_noise: f64) -> Channel {
        Channel {
            name: name.to_string(),
            limits: Limits::new(Bounds::new(20.0, 60.0), Bounds::new(0.0, 80.0)),
            rms_noise,
        }
    }

    fn initial() -> Readings {
        [
            ("thermistor_1".to_string(), 20.0),
            ("thermistor_2".to_string(), 30.0),
            ("thermistor_avg".to_string(), 25.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_initial_average() {
        let model = Temperature::new(
            vec![channel("thermistor_1", 0.0), channel("thermistor_2", 0.0), channel("thermistor_avg", 0.0)],
            &initial(),
        );
        assert!((model.initial_average() - 25.0).abs() < f64::EPSILON);
        assert!((model.average() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_update_reports_running_average() {
        let mut model = Temperature::new(
            vec![channel("thermistor_1", 0.5), channel("thermistor_2", 0.5), channel("thermistor_avg", 0.0)],
            &initial(),
        );
        let mut noise = NoiseModel::seeded(21);
        let mut snapshot = Snapshot::new(initial());

        for _ in 0..50 {
            let readings = model.update(&snapshot, &mut noise);
            let t1 = readings.get("thermistor_1").copied().unwrap_or(f64::NAN);
            let t2 = readings.get("thermistor_2").copied().unwrap_or(f64::NAN);
            let avg = readings.get("thermistor_avg").copied().unwrap_or(f64::NAN);
            assert!(((t1 + t2) / 2.0 - avg).abs() < 1e-9);
            assert!((model.average() - avg).abs() < 1e-9);
            snapshot = snapshot.with_readings([&readings]);
        }
    }

    #[test]
    fn test_thermistors_drift_by_at_most_their_noise() {
        let mut model = Temperature::new(vec![channel("thermistor_1", 0.2)], &initial());
        let mut noise = NoiseModel::seeded(4);
        let snapshot = Snapshot::new(initial());

        let readings = model.update(&snapshot, &mut noise);
        let t1 = readings.get("thermistor_1").copied().unwrap_or(f64::NAN);
        assert!((t1 - 20.0).abs() <= 0.2);
    }
}
