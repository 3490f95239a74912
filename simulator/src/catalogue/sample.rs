//! A built-in pod catalogue for demos and tests.

use super::{Bounds, Catalogue, Limits, Measurement};

const fn limits(normal: (f64, f64), critical: (f64, f64)) -> Limits {
    Limits::new(
        Bounds::new(normal.0, normal.1),
        Bounds::new(critical.0, critical.1),
    )
}

/// A representative levitating pod: a motion pack, thermistors with an
/// average channel, pneumatic pressures, hall-effect and levitation sensors,
/// a power-line resistance probe, and one enum channel that is never
/// simulated.
#[must_use]
pub fn sample_pod() -> Catalogue {
    let mut catalogue = Catalogue::new();

    // Motion
    for name in ["accelerometer_1", "accelerometer_2"] {
        catalogue.insert(Measurement::continuous(
            name,
            "motion",
            limits((-4.0, 4.0), (-10.0, 10.0)),
            500,
            16.25e-3,
        ));
    }
    catalogue.insert(Measurement::continuous(
        "velocity",
        "motion",
        limits((0.0, 45.0), (0.0, 50.0)),
        500,
        0.05,
    ));
    catalogue.insert(Measurement::continuous(
        "displacement",
        "motion",
        limits((0.0, 1800.0), (0.0, 2000.0)),
        500,
        0.01,
    ));

    // Temperature
    for name in ["thermistor_1", "thermistor_2", "thermistor_3", "thermistor_4"] {
        catalogue.insert(Measurement::continuous(
            name,
            "temperature",
            limits((20.0, 60.0), (0.0, 80.0)),
            1000,
            0.2,
        ));
    }
    catalogue.insert(Measurement::continuous(
        "thermistor_avg",
        "temperature",
        limits((20.0, 60.0), (0.0, 80.0)),
        1000,
        0.0,
    ));

    // Pneumatics
    for name in [
        "pressure_front_pull",
        "pressure_front_push",
        "pressure_back_pull",
        "pressure_back_push",
        "pressure_brakes",
    ] {
        catalogue.insert(Measurement::continuous(
            name,
            "pressure",
            limits((0.5, 2.0), (0.0, 3.0)),
            200,
            0.02,
        ));
    }
    for name in ["pressure_front_reservoir", "pressure_back_reservoir"] {
        catalogue.insert(Measurement::continuous(
            name,
            "pressure",
            limits((3.0, 7.0), (0.0, 10.0)),
            200,
            0.05,
        ));
    }

    // Magnetics and levitation
    for name in ["hall_effect_1", "hall_effect_2"] {
        catalogue.insert(Measurement::continuous(
            name,
            "hall_effect",
            limits((-50.0, 50.0), (-100.0, 100.0)),
            100,
            0.5,
        ));
    }
    for name in [
        "levitation_height_1",
        "levitation_height_2",
        "levitation_height_3",
        "levitation_height_4",
    ] {
        catalogue.insert(Measurement::continuous(
            name,
            "levitation",
            limits((0.0, 15.0), (0.0, 20.0)),
            250,
            0.1,
        ));
    }

    catalogue.insert(Measurement::continuous(
        "power_line_resistance",
        "resistance",
        limits((5.0, 15.0), (0.0, 25.0)),
        700,
        0.05,
    ));

    catalogue.insert(Measurement::enumeration("brake_state", "brakes", 100));

    catalogue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_pod_is_valid() {
        let pod = sample_pod();
        for measurement in pod.continuous() {
            let limits = measurement
                .validated_limits()
                .unwrap_or_else(|e| panic!("sample channel invalid: {e}"));
            assert!(limits.is_nested(), "{} limits not nested", measurement.name);
            assert!(measurement.sampling_period_ms > 0);
        }
    }

    #[test]
    fn test_sample_pod_groups() {
        let groups = sample_pod().groups(None);
        let types: Vec<&str> = groups.iter().map(|g| g.sensor_type()).collect();
        assert_eq!(
            types,
            vec![
                "motion",
                "temperature",
                "pressure",
                "hall_effect",
                "levitation",
                "resistance"
            ]
        );
        assert_eq!(groups[1].quantity(), 4);
    }

    #[test]
    fn test_sample_pod_enum_channel_not_simulated() {
        let pod = sample_pod();
        assert!(pod.get("brake_state").is_some());
        assert!(pod.continuous().all(|m| m.name != "brake_state"));
    }
}
