//! Motion update logic.
//!
//! Velocity follows a logistic curve towards a steady-state speed. Each tick
//! the acceleration needed to reach the curve within one sampling period is
//! computed, capped at the pod's maximum acceleration, and velocity and
//! displacement are stepped forward with explicit Euler integration:
//!
//! ```text
//! target = L / (1 + exp(-k (t - t_inf)))
//! a      = clamp((target - v) / dt, -a_max, a_max)
//! v     += a * dt
//! x     += v * dt
//! ```
//!
//! This is an approximation of a real acceleration profile, not a closed-form
//! solution.

use rand::Rng;

use super::{Channel, Independent};
use crate::catalogue::Bounds;
use crate::noise::NoiseModel;
use crate::snapshot::{Readings, Snapshot};
use crate::time::SimTime;

/// Parameters of the logistic velocity profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionProfile {
    /// Largest acceleration magnitude the pod can produce (m/s²).
    pub max_acceleration: f64,
    /// Steady-state speed as a fraction of the velocity critical-high limit.
    pub steady_state_fraction: f64,
    /// Logistic growth rate (1/s).
    pub growth_rate: f64,
    /// Time of the logistic inflection point (s).
    pub inflection_time_s: f64,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            max_acceleration: 5.0,
            steady_state_fraction: 0.95,
            growth_rate: 0.4,
            inflection_time_s: 12.5,
        }
    }
}

impl MotionProfile {
    /// Target velocity at `t` seconds for a steady-state speed of `ceiling`.
    #[must_use]
    pub fn target_velocity(&self, t: f64, ceiling: f64) -> f64 {
        ceiling / (1.0 + (-self.growth_rate * (t - self.inflection_time_s)).exp())
    }
}

/// Noise-free kinematic state after the latest tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionState {
    pub acceleration: f64,
    pub velocity: f64,
    pub displacement: f64,
}

/// Update logic for the `motion` sensor type.
#[derive(Debug, Clone)]
pub struct Motion {
    profile: MotionProfile,
    /// Integration step, the sensor type's sampling period in seconds.
    dt: f64,
    /// Steady-state speed the logistic curve approaches.
    steady_state_velocity: f64,
    acceleration: Vec<Channel>,
    velocity: Vec<Channel>,
    displacement: Vec<Channel>,
    /// Motion channels with no kinematic role, sampled independently.
    others: Independent,
    state: MotionState,
}

impl Motion {
    /// Split `channels` into kinematic roles and seed the state from the
    /// starting readings.
    ///
    /// Without a velocity channel the steady-state speed is zero.
    #[must_use]
    pub fn new(
        channels: Vec<Channel>,
        initial: &Readings,
        sampling_period: SimTime,
        profile: MotionProfile,
    ) -> Self {
        let mut acceleration = Vec::new();
        let mut velocity = Vec::new();
        let mut displacement = Vec::new();
        let mut others = Vec::new();
        for channel in channels {
            match channel.base_key() {
                "accelerometer" | "acceleration" => acceleration.push(channel),
                "velocity" => velocity.push(channel),
                "displacement" => displacement.push(channel),
                _ => others.push(channel),
            }
        }

        let ceiling = velocity
            .iter()
            .map(|c| c.critical().high)
            .reduce(f64::max)
            .unwrap_or(0.0);

        let initial = Snapshot::new(initial.clone());
        let state = MotionState {
            acceleration: mean(&initial, &acceleration).unwrap_or(0.0),
            velocity: mean(&initial, &velocity).unwrap_or(0.0),
            displacement: mean(&initial, &displacement).unwrap_or(0.0),
        };

        Self {
            profile,
            dt: sampling_period.as_secs_f64(),
            steady_state_velocity: profile.steady_state_fraction * ceiling,
            acceleration,
            velocity,
            displacement,
            others: Independent::new(others),
            state,
        }
    }

    #[must_use]
    pub const fn state(&self) -> MotionState {
        self.state
    }

    /// Advance one sampling period from the velocity and displacement in
    /// `snapshot`.
    pub fn update<R: Rng>(
        &mut self,
        snapshot: &Snapshot,
        elapsed: SimTime,
        noise: &mut NoiseModel<R>,
    ) -> Readings {
        let v = mean(snapshot, &self.velocity).unwrap_or(self.state.velocity);
        let x = mean(snapshot, &self.displacement).unwrap_or(self.state.displacement);

        let target = self
            .profile
            .target_velocity(elapsed.as_secs_f64(), self.steady_state_velocity);
        let a_max = self.profile.max_acceleration.abs();
        let a = ((target - v) / self.dt).clamp(-a_max, a_max);
        let v = a.mul_add(self.dt, v);
        let x = v.mul_add(self.dt, x);
        self.state = MotionState {
            acceleration: a,
            velocity: v,
            displacement: x,
        };

        let mut readings = self.others.update(noise);
        // Noisy acceleration readings stay within the pod's envelope too
        let envelope = Bounds::new(-a_max, a_max);
        for channel in &self.acceleration {
            let bounds = channel
                .critical()
                .intersect(&envelope)
                .unwrap_or(*channel.critical());
            let reading = noise.perturb(a, &bounds, channel.rms_noise);
            readings.insert(channel.name.clone(), reading);
        }
        for (channels, value) in [(&self.velocity, v), (&self.displacement, x)] {
            for channel in channels {
                let reading = noise.perturb(value, channel.critical(), channel.rms_noise);
                readings.insert(channel.name.clone(), reading);
            }
        }
        readings
    }
}

fn mean(snapshot: &Snapshot, channels: &[Channel]) -> Option<f64> {
    snapshot.mean_of(channels.iter().map(|c| c.name.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Bounds, Limits};

    fn channel(name: &str, low: f64, high: f64) -> Channel {
        Channel {
            name: name.to_string(),
            limits: Limits::new(Bounds::new(low, high), Bounds::new(low, high)),
            rms_noise: 0.0,
        }
    }

    fn pod() -> (Motion, Snapshot) {
        let channels = vec![
            channel("accelerometer_1", -10.0, 10.0),
            channel("velocity_1", 0.0, 50.0),
            channel("displacement_1", 0.0, 5000.0),
        ];
        let initial: Readings = [
            ("accelerometer_1".to_string(), 0.0),
            ("velocity_1".to_string(), 5.0),
            ("displacement_1".to_string(), 0.0),
        ]
        .into_iter()
        .collect();
        let motion = Motion::new(
            channels,
            &initial,
            SimTime::from_millis(500),
            MotionProfile::default(),
        );
        (motion, Snapshot::new(initial))
    }

    #[test]
    fn test_logistic_profile_shape() {
        let profile = MotionProfile::default();
        let ceiling = 47.5;
        assert!((profile.target_velocity(12.5, ceiling) - ceiling / 2.0).abs() < 1e-9);
        assert!(profile.target_velocity(0.0, ceiling) < profile.target_velocity(5.0, ceiling));
        assert!(profile.target_velocity(100.0, ceiling) <= ceiling);
        assert!((profile.target_velocity(100.0, ceiling) - ceiling).abs() < 1e-6);
    }

    #[test]
    fn test_motion_seeds_state_from_initial_readings() {
        let (motion, _) = pod();
        let state = motion.state();
        assert!(state.acceleration.abs() < f64::EPSILON);
        assert!((state.velocity - 5.0).abs() < f64::EPSILON);
        assert!(state.displacement.abs() < f64::EPSILON);
    }

    #[test]
    fn test_first_step_follows_logistic_euler_rule() {
        let (mut motion, snapshot) = pod();
        let mut noise = NoiseModel::seeded(1);

        let readings = motion.update(&snapshot, SimTime::from_millis(500), &mut noise);

        // target(0.5s) is well below 5 m/s, so the step is capped at -a_max.
        let a = readings.get("accelerometer_1").copied().unwrap_or(f64::NAN);
        let v = readings.get("velocity_1").copied().unwrap_or(f64::NAN);
        let x = readings.get("displacement_1").copied().unwrap_or(f64::NAN);
        assert!((a + 5.0).abs() < 1e-9, "a = {a}");
        assert!((v - 2.5).abs() < 1e-9, "v = {v}");
        assert!((x - 1.25).abs() < 1e-9, "x = {x}");
    }

    #[test]
    fn test_acceleration_never_exceeds_maximum() {
        let (mut motion, mut snapshot) = pod();
        let mut noise = NoiseModel::seeded(1);

        for step in 1..=120 {
            let readings = motion.update(&snapshot, SimTime::from_millis(step * 500), &mut noise);
            let a = readings.get("accelerometer_1").copied().unwrap_or(f64::NAN);
            assert!(a.abs() <= 5.0 + 1e-12, "step {step}: a = {a}");
            snapshot = snapshot.with_readings([&readings]);
        }

        // After a minute the pod cruises near its steady-state speed.
        let v = snapshot.get("velocity_1").unwrap_or(f64::NAN);
        assert!((v - 47.5).abs() < 1.0, "v = {v}");
    }

    #[test]
    fn test_noisy_acceleration_stays_within_maximum() {
        let channels = vec![
            Channel {
                name: "accelerometer_1".to_string(),
                limits: Limits::new(Bounds::new(-4.0, 4.0), Bounds::new(-10.0, 10.0)),
                rms_noise: 0.5,
            },
            channel("velocity_1", 0.0, 50.0),
        ];
        let initial: Readings = [
            ("accelerometer_1".to_string(), 0.0),
            ("velocity_1".to_string(), 5.0),
        ]
        .into_iter()
        .collect();
        let mut motion = Motion::new(
            channels,
            &initial,
            SimTime::from_millis(500),
            MotionProfile::default(),
        );
        let mut snapshot = Snapshot::new(initial);
        let mut noise = NoiseModel::seeded(9);

        // The first steps saturate at -a_max, where noise would push past it
        let mut saturated = 0;
        for step in 1..=40 {
            let readings = motion.update(&snapshot, SimTime::from_millis(step * 500), &mut noise);
            let a = readings.get("accelerometer_1").copied().unwrap_or(f64::NAN);
            assert!(a.abs() <= 5.0, "step {step}: a = {a}");
            if (motion.state().acceleration.abs() - 5.0).abs() < 1e-12 {
                saturated += 1;
            }
            snapshot = snapshot.with_readings([&readings]);
        }
        assert!(saturated > 0);
    }

    #[test]
    fn test_update_does_not_mutate_snapshot() {
        let (mut motion, snapshot) = pod();
        let before = snapshot.clone();
        let mut noise = NoiseModel::seeded(1);
        let _ = motion.update(&snapshot, SimTime::from_millis(500), &mut noise);
        assert_eq!(snapshot, before);
    }

    #[test]
    fn test_non_kinematic_channels_are_sampled_independently() {
        let channels = vec![channel("velocity", 0.0, 50.0), channel("keyence_1", 0.0, 100.0)];
        let initial: Readings = [("velocity".to_string(), 5.0), ("keyence_1".to_string(), 0.0)]
            .into_iter()
            .collect();
        let mut motion = Motion::new(
            channels,
            &initial,
            SimTime::from_millis(100),
            MotionProfile::default(),
        );
        let mut noise = NoiseModel::seeded(3);
        let readings = motion.update(&Snapshot::new(initial), SimTime::from_millis(100), &mut noise);
        let keyence = readings.get("keyence_1").copied().unwrap_or(f64::NAN);
        assert!((0.0..=100.0).contains(&keyence));
        assert_eq!(readings.len(), 2);
    }
}
