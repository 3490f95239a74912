//! Initial-value policy.
//!
//! Each channel's starting value is chosen from its base key. Kinematic and
//! positional channels start at rest, velocity starts at a tenth of its
//! critical ceiling so the logistic profile has something to grow from,
//! and the remaining known channel families start at fixed nominal values.
//! Anything else starts at a random value and is reported, since it means
//! the catalogue has gained a channel the simulator does not model.

use rand::Rng;

use super::Channel;
use crate::error::{SimulationError, SimulationResult};
use crate::noise::NoiseModel;
use crate::snapshot::Readings;

/// Fraction of the critical-high limit a velocity channel starts at.
pub const INITIAL_VELOCITY_FRACTION: f64 = 0.1;
/// Ambient temperature of a thermistor at the start of a run.
pub const AMBIENT_TEMPERATURE: f64 = 25.0;
/// Nominal resistance of the power line.
pub const NOMINAL_LINE_RESISTANCE: f64 = 10.0;
/// Pressure in a push, pull or brake line.
pub const LINE_PRESSURE: f64 = 1.0;
/// Pressure in a reservoir.
pub const RESERVOIR_PRESSURE: f64 = 5.0;

const AT_REST: [&str; 6] = [
    "accelerometer",
    "acceleration",
    "displacement",
    "hall_effect",
    "levitation_height",
    "keyence",
];

/// Catalogue conditions noticed while choosing starting values.
///
/// Each is also logged at `warn` when it is recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialReport {
    /// Channels with no starting-value rule, started at a random value.
    pub unrecognised: Vec<String>,
    /// Channels whose nominal starting value lay outside their critical
    /// bounds and was clamped.
    pub clamped: Vec<String>,
}

impl InitialReport {
    /// Whether every channel started from its nominal value.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.unrecognised.is_empty() && self.clamped.is_empty()
    }
}

/// Starting value for a single channel, clamped into its critical bounds.
///
/// Unrecognised and clamped channels are added to `report`.
///
/// # Errors
///
/// Returns `ZeroInitialVelocity` if a velocity channel would start at zero.
pub fn initial_value<R: Rng>(
    channel: &Channel,
    noise: &mut NoiseModel<R>,
    report: &mut InitialReport,
) -> SimulationResult<f64> {
    let key = channel.base_key();
    let value = if AT_REST.contains(&key) {
        0.0
    } else if key == "velocity" {
        let value = channel.critical().high * INITIAL_VELOCITY_FRACTION;
        if value.abs() < f64::EPSILON {
            return Err(SimulationError::ZeroInitialVelocity {
                channel: channel.name.clone(),
            });
        }
        value
    } else if key == "thermistor" {
        AMBIENT_TEMPERATURE
    } else if key == "power_line_resistance" {
        NOMINAL_LINE_RESISTANCE
    } else if is_line_pressure(&channel.name) {
        LINE_PRESSURE
    } else if channel.name.ends_with("reservoir") {
        RESERVOIR_PRESSURE
    } else {
        tracing::warn!(
            "unrecognised sensor '{}', starting from a random value within {:?}",
            channel.name,
            channel.critical()
        );
        report.unrecognised.push(channel.name.clone());
        return Ok(noise.uniform(channel.critical()));
    };

    let clamped = channel.critical().clamp(value);
    if clamped.to_bits() != value.to_bits() {
        tracing::warn!(
            "initial value {} for '{}' is outside its critical limits {:?}, clamped to {}",
            value,
            channel.name,
            channel.critical(),
            clamped
        );
        report.clamped.push(channel.name.clone());
    }
    Ok(clamped)
}

/// Starting readings for all channels of one sensor type.
///
/// Average channels (names ending in `avg`) start at the mean of the
/// type's other channels.
///
/// # Errors
///
/// Propagates the first [`initial_value`] failure.
#[allow(clippy::cast_precision_loss)] // Channel counts are tiny
pub fn initial_readings<R: Rng>(
    channels: &[Channel],
    noise: &mut NoiseModel<R>,
    report: &mut InitialReport,
) -> SimulationResult<Readings> {
    let mut readings = Readings::new();
    let mut sum = 0.0;
    let mut count = 0usize;
    for channel in channels.iter().filter(|c| !c.is_average()) {
        let value = initial_value(channel, noise, report)?;
        sum += value;
        count += 1;
        readings.insert(channel.name.clone(), value);
    }

    for channel in channels.iter().filter(|c| c.is_average()) {
        let value = if count > 0 {
            channel.critical().clamp(sum / count as f64)
        } else {
            initial_value(channel, noise, report)?
        };
        readings.insert(channel.name.clone(), value);
    }
    Ok(readings)
}

/// A push, pull or brake line with no `reservoir` after the keyword.
fn is_line_pressure(name: &str) -> bool {
    ["push", "pull", "brake"].iter().any(|keyword| {
        name.rfind(keyword)
            .is_some_and(|start| !name[start + keyword.len()..].contains("reservoir"))
    })
}
