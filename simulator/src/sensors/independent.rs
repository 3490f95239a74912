//! Independent random update logic.
//!
//! Used for every sensor type without cross-channel dependencies (pressure,
//! hall-effect, levitation height, line resistance, ...) and for every type
//! when a run is in random mode.

use rand::Rng;

use super::Channel;
use crate::noise::NoiseModel;
use crate::snapshot::Readings;

/// Samples each channel on its own: a uniform value within the critical
/// limits plus noise.
#[derive(Debug, Clone, Default)]
pub struct Independent {
    channels: Vec<Channel>,
}

impl Independent {
    #[must_use]
    pub const fn new(channels: Vec<Channel>) -> Self {
        Self { channels }
    }

    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn update<R: Rng>(&self, noise: &mut NoiseModel<R>) -> Readings {
        self.channels
            .iter()
            .map(|channel| {
                (
                    channel.name.clone(),
                    noise.sample(&channel.limits, channel.rms_noise),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{Bounds, Limits};

    #[test]
    fn test_independent_samples_within_limits() {
        let channels = vec![
            Channel {
                name: "hall_effect_1".to_string(),
                limits: Limits::new(Bounds::new(-50.0, 50.0), Bounds::new(-100.0, 100.0)),
                rms_noise: 5.0,
            },
            Channel {
                name: "hall_effect_2".to_string(),
                limits: Limits::new(Bounds::new(-50.0, 50.0), Bounds::new(-100.0, 100.0)),
                rms_noise: 5.0,
            },
        ];
        let model = Independent::new(channels);
        let mut noise = NoiseModel::seeded(8);

        for _ in 0..500 {
            let readings = model.update(&mut noise);
            assert_eq!(readings.len(), 2);
            for value in readings.values() {
                assert!((-100.0..=100.0).contains(value));
            }
        }
    }

    #[test]
    fn test_independent_without_channels_is_empty() {
        let mut noise = NoiseModel::seeded(8);
        assert!(Independent::default().update(&mut noise).is_empty());
    }
}
