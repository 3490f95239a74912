//! Errors raised while building a simulation run.
//!
//! Every variant is a structural problem with the catalogue or the run
//! options. They are all detected in `Simulation::new`, before the first
//! tick, so a run that starts always runs to completion.

/// Errors that prevent a simulation run from being constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A continuous channel has no limits to sample within.
    MissingLimits { channel: String },
    /// The critical bounds of a channel are inverted or not finite.
    InvalidLimits { channel: String, low: f64, high: f64 },
    /// A sensor type has a zero sampling period, so its clock never advances.
    ZeroSamplingPeriod { sensor_type: String },
    /// A velocity channel would start at zero.
    ZeroInitialVelocity { channel: String },
    /// A bounded random value was requested for an enum channel.
    UnsupportedFormat { channel: String },
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingLimits { channel } => {
                write!(f, "continuous channel '{channel}' has no limits")
            }
            Self::InvalidLimits { channel, low, high } => write!(
                f,
                "channel '{channel}' has invalid critical limits: low {low} > high {high}"
            ),
            Self::ZeroSamplingPeriod { sensor_type } => {
                write!(f, "sensor type '{sensor_type}' has a zero sampling period")
            }
            Self::ZeroInitialVelocity { channel } => write!(
                f,
                "velocity channel '{channel}' would start at zero (critical high must be non-zero)"
            ),
            Self::UnsupportedFormat { channel } => {
                write!(f, "channel '{channel}' is not a continuous measurement")
            }
        }
    }
}

impl std::error::Error for SimulationError {}

/// Convenience alias for `Result<T, SimulationError>`.
pub type SimulationResult<T> = Result<T, SimulationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_limits() {
        let error = SimulationError::InvalidLimits {
            channel: "pressure_1".to_string(),
            low: 10.0,
            high: 2.0,
        };
        let message = error.to_string();
        assert!(message.contains("pressure_1"));
        assert!(message.contains("10"));
        assert!(message.contains('2'));
    }

    #[test]
    fn test_error_display_zero_period() {
        let error = SimulationError::ZeroSamplingPeriod {
            sensor_type: "motion".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "sensor type 'motion' has a zero sampling period"
        );
    }

    #[test]
    fn test_error_is_std_error() {
        let error: Box<dyn std::error::Error> = Box::new(SimulationError::MissingLimits {
            channel: "x".to_string(),
        });
        assert!(!error.to_string().is_empty());
    }
}
