//! Simulator configuration module.
//!
//! This module provides configuration loading for the simulator binary from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `POD_SIM_DURATION_MS`: Simulated run length in milliseconds (default: `10000`)
//! - `POD_SIM_RANDOM`: `true`/`1` for independent random sampling (default: `false`)
//! - `POD_SIM_SEED`: Seed for reproducible runs (default: drawn at startup)
//! - `POD_SIM_CHANNELS`: Comma-separated allow-list of channels (default: all)
//!
//! # Invariants
//!
//! - `duration_ms` is always a valid `u64`
//! - `channels`, when present, contains no empty names

use crate::simulation::RunOptions;

/// Simulator configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Simulated run length in milliseconds.
    pub duration_ms: u64,
    /// Whether to bypass the per-type update models.
    pub random_mode: bool,
    /// Seed for the run. `None` means the caller picks one.
    pub seed: Option<u64>,
    /// Allow-list of channels to simulate. `None` simulates all of them.
    pub channels: Option<Vec<String>>,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            duration_ms: Self::DEFAULT_DURATION_MS,
            random_mode: false,
            seed: None,
            channels: None,
        }
    }
}

impl SimConfig {
    /// Default simulated run length.
    pub const DEFAULT_DURATION_MS: u64 = 10_000;

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value if set.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let duration_ms = match lookup("POD_SIM_DURATION_MS") {
            Some(value) => parse_u64("POD_SIM_DURATION_MS", &value)?,
            None => Self::DEFAULT_DURATION_MS,
        };
        let random_mode = match lookup("POD_SIM_RANDOM") {
            Some(value) => parse_bool("POD_SIM_RANDOM", &value)?,
            None => false,
        };
        let seed = lookup("POD_SIM_SEED")
            .map(|value| parse_u64("POD_SIM_SEED", &value))
            .transpose()?;
        let channels = lookup("POD_SIM_CHANNELS").map(|value| parse_list(&value));

        Ok(Self {
            duration_ms,
            random_mode,
            seed,
            channels,
        })
    }

    /// Run options for this configuration with the given seed.
    #[must_use]
    pub fn run_options(&self, seed: u64) -> RunOptions {
        let options = RunOptions::new(self.duration_ms)
            .with_random_mode(self.random_mode)
            .with_seed(seed);
        match &self.channels {
            Some(channels) => options.with_channels(channels.to_vec()),
            None => options,
        }
    }
}

fn parse_u64(name: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
        name: name.to_string(),
        message: format!("'{value}' is not a non-negative integer"),
    })
}

fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a boolean (use true/false)"),
        }),
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<SimConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        SimConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_values() {
        let config = load(&[]).unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.duration_ms, 10_000);
        assert!(!config.random_mode);
        assert!(config.seed.is_none());
        assert!(config.channels.is_none());
    }

    #[test]
    fn test_all_values() {
        let config = load(&[
            ("POD_SIM_DURATION_MS", "2500"),
            ("POD_SIM_RANDOM", "TRUE"),
            ("POD_SIM_SEED", "42"),
            ("POD_SIM_CHANNELS", "velocity, thermistor_1,,"),
        ])
        .unwrap();
        assert_eq!(config.duration_ms, 2500);
        assert!(config.random_mode);
        assert_eq!(config.seed, Some(42));
        assert_eq!(
            config.channels,
            Some(vec!["velocity".to_string(), "thermistor_1".to_string()])
        );
    }

    #[test]
    fn test_invalid_duration() {
        let error = load(&[("POD_SIM_DURATION_MS", "soon")]).unwrap_err();
        assert_eq!(
            error.to_string(),
            "invalid value for POD_SIM_DURATION_MS: 'soon' is not a non-negative integer"
        );
    }

    #[test]
    fn test_invalid_random_flag() {
        assert!(load(&[("POD_SIM_RANDOM", "maybe")]).is_err());
    }

    #[test]
    fn test_run_options() {
        let config = load(&[("POD_SIM_CHANNELS", "velocity"), ("POD_SIM_RANDOM", "1")]).unwrap();
        let options = config.run_options(9);
        assert_eq!(options.seed, 9);
        assert!(options.random_mode);
        assert_eq!(options.channels, Some(vec!["velocity".to_string()]));
        assert_eq!(options.duration_ms, SimConfig::DEFAULT_DURATION_MS);
    }
}
