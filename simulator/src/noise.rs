//! Noise and bounds model.
//!
//! Produces bounded pseudo-random readings for a channel and additive noise
//! perturbations. All randomness flows through one RNG owned by the model,
//! so a seeded model makes a whole run reproducible. Any `rand::Rng` can be
//! swapped in through [`NoiseModel::from_rng`].

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalogue::{Bounds, Limits, ValueFormat};

/// Random source for bounded readings and noise.
#[derive(Debug, Clone)]
pub struct NoiseModel<R = StdRng> {
    rng: R,
}

impl NoiseModel<StdRng> {
    /// A model seeded for reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> NoiseModel<R> {
    /// Wrap an arbitrary RNG.
    #[must_use]
    pub const fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Uniform value in `[critical.low, critical.high)`.
    ///
    /// Returns `None` for enum channels, which are never simulated. A
    /// degenerate range (`low == high`) yields `low`.
    pub fn random_value(&mut self, limits: &Limits, format: ValueFormat) -> Option<f64> {
        match format {
            ValueFormat::Continuous => Some(self.uniform(&limits.critical)),
            ValueFormat::Enum => None,
        }
    }

    /// Random perturbation in `[-|rms|, |rms|]`, zero on average.
    ///
    /// A zero or non-finite amplitude returns exactly `0.0` without touching
    /// the RNG.
    pub fn add_noise(&mut self, rms_amplitude: f64) -> f64 {
        let amplitude = rms_amplitude.abs();
        if amplitude <= 0.0 || !amplitude.is_finite() {
            return 0.0;
        }
        self.rng.random_range(-amplitude..=amplitude)
    }

    /// Independent reading for a continuous channel: a uniform value plus
    /// noise, clamped into the critical bounds.
    pub fn sample(&mut self, limits: &Limits, rms_amplitude: f64) -> f64 {
        let value = self.uniform(&limits.critical);
        self.perturb(value, &limits.critical, rms_amplitude)
    }

    /// `value` plus noise, clamped into `bounds`.
    pub fn perturb(&mut self, value: f64, bounds: &Bounds, rms_amplitude: f64) -> f64 {
        bounds.clamp(value + self.add_noise(rms_amplitude))
    }

    /// Uniform value in `[low, high)`, or `low` for an empty range.
    pub fn uniform(&mut self, bounds: &Bounds) -> f64 {
        if bounds.low < bounds.high {
            self.rng.random_range(bounds.low..bounds.high)
        } else {
            bounds.low
        }
    }
}
