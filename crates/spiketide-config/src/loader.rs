// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SpiketideConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const CONFIG_FILE_NAME: &str = "spiketide.toml";

/// Find the Spiketide configuration file
///
/// Search order:
/// 1. `SPIKETIDE_CONFIG_PATH` environment variable
/// 2. Current working directory: `./spiketide.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKETIDE_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKETIDE_CONFIG_PATH not found: {}",
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        search_paths.extend(
            cwd.ancestors()
                .skip(1)
                .take(5)
                .map(|dir| dir.join(CONFIG_FILE_NAME)),
        );
    }

    if let Some(path) = search_paths.iter().find(|path| path.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet SPIKETIDE_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Value validation is left to [`validate_config`](crate::validate_config).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpiketideConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };
    tracing::debug!(target: "spiketide-config", path = %config_file.display(), "loading configuration");

    let content = fs::read_to_string(&config_file)?;
    let mut config: SpiketideConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Parse `raw` into `slot`, leaving it unchanged on parse failure
fn override_with<T: FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.parse::<T>() {
        Ok(value) => {
            *slot = value;
            tracing::debug!(target: "spiketide-config", key, value = raw, "override applied");
        }
        Err(_) => {
            tracing::warn!(target: "spiketide-config", key, value = raw, "ignoring unparsable override");
        }
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKETIDE_RESOLUTION_MS` -> `simulation.resolution_ms`
/// - `SPIKETIDE_STEPS` -> `simulation.steps`
/// - `SPIKETIDE_SEED` -> `simulation.seed`
/// - `SPIKETIDE_TAU_PLUS` -> `synapse.tau_plus`
/// - `SPIKETIDE_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut SpiketideConfig) {
    if let Ok(value) = env::var("SPIKETIDE_RESOLUTION_MS") {
        override_with(&mut config.simulation.resolution_ms, "SPIKETIDE_RESOLUTION_MS", &value);
    }
    if let Ok(value) = env::var("SPIKETIDE_STEPS") {
        override_with(&mut config.simulation.steps, "SPIKETIDE_STEPS", &value);
    }
    if let Ok(value) = env::var("SPIKETIDE_SEED") {
        override_with(&mut config.simulation.seed, "SPIKETIDE_SEED", &value);
    }
    if let Ok(value) = env::var("SPIKETIDE_TAU_PLUS") {
        override_with(&mut config.synapse.tau_plus, "SPIKETIDE_TAU_PLUS", &value);
    }
    if let Ok(value) = env::var("SPIKETIDE_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"steps": "5000", "weight": "0.5"}`)
pub fn apply_cli_overrides(config: &mut SpiketideConfig, cli_args: &HashMap<String, String>) {
    for (key, value) in cli_args {
        match key.as_str() {
            "resolution_ms" => override_with(&mut config.simulation.resolution_ms, key, value),
            "steps" => override_with(&mut config.simulation.steps, key, value),
            "seed" => override_with(&mut config.simulation.seed, key, value),
            "u_th" => override_with(&mut config.neuron.u_th, key, value),
            "u_noise" => override_with(&mut config.neuron.u_noise, key, value),
            "noise_length" => override_with(&mut config.neuron.noise_length, key, value),
            "tau_plus" => override_with(&mut config.synapse.tau_plus, key, value),
            "lambda" => override_with(&mut config.synapse.lambda, key, value),
            "alpha" => override_with(&mut config.synapse.alpha, key, value),
            "mu" => override_with(&mut config.synapse.mu, key, value),
            "weight" => override_with(&mut config.synapse.weight, key, value),
            "delay_ms" => override_with(&mut config.synapse.delay_ms, key, value),
            "log_level" => config.logging.level = value.clone(),
            "log_format" => config.logging.format = value.clone(),
            _ => {
                tracing::warn!(target: "spiketide-config", key = key.as_str(), "unknown CLI override");
            }
        }
    }
}
