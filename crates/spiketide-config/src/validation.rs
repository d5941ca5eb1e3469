// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Every violation is collected so that a single run reports all bad fields.

use crate::{ConfigError, ConfigResult, SpiketideConfig};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    NonPositive { field: String, value: f64 },
    NotFinite { field: String, value: f64 },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositive { field, value } => {
                write!(f, "{} = {} must be > 0", field, value)
            }
            Self::NotFinite { field, value } => {
                write!(f, "{} = {} must be finite", field, value)
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &SpiketideConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);
    if errors.is_empty() {
        return Ok(());
    }

    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

/// All violations in `config`, in section order
pub fn collect_errors(config: &SpiketideConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_time_constants(config, &mut errors);
    validate_finite_values(config, &mut errors);
    validate_synapse(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn positive(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(ConfigValidationError::NonPositive {
            field: field.to_string(),
            value,
        });
    }
}

fn finite(field: &str, value: f64, errors: &mut Vec<ConfigValidationError>) {
    if !value.is_finite() {
        errors.push(ConfigValidationError::NotFinite {
            field: field.to_string(),
            value,
        });
    }
}

fn validate_time_constants(config: &SpiketideConfig, errors: &mut Vec<ConfigValidationError>) {
    positive("simulation.resolution_ms", config.simulation.resolution_ms, errors);
    positive("neuron.tau_epsp", config.neuron.tau_epsp, errors);
    positive("neuron.tau_reset", config.neuron.tau_reset, errors);
    positive("neuron.c_m", config.neuron.c_m, errors);
    positive("synapse.tau_plus", config.synapse.tau_plus, errors);
    positive("synapse.tau_minus", config.synapse.tau_minus, errors);
}

fn validate_finite_values(config: &SpiketideConfig, errors: &mut Vec<ConfigValidationError>) {
    let neuron = &config.neuron;
    finite("neuron.e_l", neuron.e_l, errors);
    finite("neuron.u_th", neuron.u_th, errors);
    finite("neuron.u_epsp", neuron.u_epsp, errors);
    finite("neuron.u_reset", neuron.u_reset, errors);
    finite("neuron.u_noise", neuron.u_noise, errors);

    let synapse = &config.synapse;
    finite("synapse.lambda", synapse.lambda, errors);
    finite("synapse.alpha", synapse.alpha, errors);
    finite("synapse.mu", synapse.mu, errors);
}

fn validate_synapse(config: &SpiketideConfig, errors: &mut Vec<ConfigValidationError>) {
    let synapse = &config.synapse;
    if !synapse.weight.is_finite() || synapse.weight < 0.0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "synapse.weight".to_string(),
            reason: format!("must be >= 0, got {}", synapse.weight),
        });
    }

    let resolution = config.simulation.resolution_ms;
    if resolution > 0.0 && resolution.is_finite() {
        let steps = (synapse.delay_ms / resolution).round();
        if steps.is_nan() || steps < 1.0 {
            errors.push(ConfigValidationError::InvalidValue {
                field: "synapse.delay_ms".to_string(),
                reason: format!(
                    "{} ms is less than one simulation step of {} ms",
                    synapse.delay_ms, resolution
                ),
            });
        }
    }
}

fn validate_logging(config: &SpiketideConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.logging.level.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "logging.level".to_string(),
        });
    }
    let format = config.logging.format.trim().to_ascii_lowercase();
    if !matches!(format.as_str(), "pretty" | "text" | "compact" | "json") {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: format!(
                "expected one of pretty, compact, json; got '{}'",
                config.logging.format
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SpiketideConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_all_violations_reported() {
        let mut config = SpiketideConfig::default();
        config.neuron.tau_epsp = 0.0;
        config.synapse.tau_plus = -1.0;
        config.logging.level = "  ".to_string();

        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 3);

        let message = validate_config(&config).unwrap_err().to_string();
        assert!(message.contains("neuron.tau_epsp"));
        assert!(message.contains("synapse.tau_plus"));
        assert!(message.contains("logging.level"));
    }

    #[test]
    fn test_delay_shorter_than_step() {
        let mut config = SpiketideConfig::default();
        config.simulation.resolution_ms = 1.0;
        config.synapse.delay_ms = 0.4;

        let errors = collect_errors(&config);
        assert!(matches!(
            errors.as_slice(),
            [ConfigValidationError::InvalidValue { field, .. }] if field == "synapse.delay_ms"
        ));
    }

    #[test]
    fn test_nan_resolution_rejected() {
        let mut config = SpiketideConfig::default();
        config.simulation.resolution_ms = f64::NAN;
        assert!(collect_errors(&config)
            .iter()
            .any(|e| matches!(e, ConfigValidationError::NonPositive { field, .. } if field == "simulation.resolution_ms")));
    }

    #[test]
    fn test_invalid_log_format() {
        let mut config = SpiketideConfig::default();
        config.logging.format = "xml".to_string();
        config.synapse.weight = -1.0;
        let errors = collect_errors(&config);
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigValidationError::InvalidValue { field, .. } if field == "logging.format")));

        for accepted in ["JSON", " compact ", "text"] {
            config.synapse.weight = 1.0;
            config.logging.format = accepted.to_string();
            assert!(validate_config(&config).is_ok(), "{accepted}");
        }
    }
}
