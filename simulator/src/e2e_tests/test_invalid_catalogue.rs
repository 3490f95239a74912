//! Catalogue problems are reported before any tick runs.

use crate::catalogue::{Catalogue, Measurement, ValueFormat};
use crate::e2e_tests::helpers::limits;
use crate::error::SimulationError;
use crate::simulation::{RunOptions, Simulation};

fn build(catalogue: &Catalogue) -> Result<(), SimulationError> {
    Simulation::new(catalogue, RunOptions::new(1000)).map(|_| ())
}

#[test]
fn test_inverted_critical_limits() {
    let catalogue = Catalogue::new().with(Measurement::continuous(
        "pressure_brakes",
        "pressure",
        limits((0.5, 2.0), (3.0, 0.0)),
        200,
        0.0,
    ));
    assert_eq!(
        build(&catalogue),
        Err(SimulationError::InvalidLimits {
            channel: "pressure_brakes".to_string(),
            low: 3.0,
            high: 0.0,
        })
    );
}

#[test]
fn test_missing_limits() {
    let catalogue = Catalogue::new().with(Measurement {
        name: "hall_effect_1".to_string(),
        sensor_type: "hall_effect".to_string(),
        format: ValueFormat::Continuous,
        limits: None,
        sampling_period_ms: 100,
        rms_noise: 0.0,
    });
    assert_eq!(
        build(&catalogue),
        Err(SimulationError::MissingLimits {
            channel: "hall_effect_1".to_string()
        })
    );
}

#[test]
fn test_zero_sampling_period() {
    let catalogue = Catalogue::new().with(Measurement::continuous(
        "levitation_height_1",
        "levitation",
        limits((0.0, 15.0), (0.0, 20.0)),
        0,
        0.0,
    ));
    assert_eq!(
        build(&catalogue),
        Err(SimulationError::ZeroSamplingPeriod {
            sensor_type: "levitation".to_string()
        })
    );
}

#[test]
fn test_zero_velocity_ceiling() {
    let catalogue = Catalogue::new().with(Measurement::continuous(
        "velocity",
        "motion",
        limits((0.0, 0.0), (0.0, 0.0)),
        500,
        0.0,
    ));
    assert_eq!(
        build(&catalogue),
        Err(SimulationError::ZeroInitialVelocity {
            channel: "velocity".to_string()
        })
    );
}

#[test]
fn test_invalid_channel_outside_selection_is_not_checked() {
    let catalogue = Catalogue::new()
        .with(Measurement::continuous(
            "pressure_brakes",
            "pressure",
            limits((0.5, 2.0), (3.0, 0.0)),
            200,
            0.0,
        ))
        .with(Measurement::continuous(
            "thermistor_1",
            "temperature",
            limits((20.0, 60.0), (0.0, 80.0)),
            1000,
            0.0,
        ));
    let options = RunOptions::new(1000).with_channels(vec!["thermistor_1".to_string()]);
    assert!(Simulation::new(&catalogue, options).is_ok());
}
