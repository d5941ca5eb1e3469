// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to one section of `spiketide.toml`. Missing keys take the
//! model defaults.

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpiketideConfig {
    pub simulation: SimulationConfig,
    pub neuron: NeuronConfig,
    pub synapse: SynapseConfig,
    pub logging: LoggingConfig,
}

/// Time grid and run length
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Step size h (ms)
    pub resolution_ms: f64,
    pub steps: u64,
    /// Seed for generated noise
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            resolution_ms: 0.1,
            steps: 1000,
            seed: 42,
        }
    }
}

/// Spike-response neuron parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuronConfig {
    pub tau_epsp: f64,
    pub tau_reset: f64,
    pub e_l: f64,
    pub u_th: f64,
    pub u_epsp: f64,
    pub u_reset: f64,
    pub c_m: f64,
    pub u_noise: f64,
    /// Length of the generated Gaussian noise sequence; 0 disables noise
    pub noise_length: usize,
}

impl Default for NeuronConfig {
    fn default() -> Self {
        Self {
            tau_epsp: 8.5,
            tau_reset: 15.4,
            e_l: 0.0,
            u_th: 1.0,
            u_epsp: 0.77,
            u_reset: 2.31,
            c_m: 1.0,
            u_noise: 0.0,
            noise_length: 0,
        }
    }
}

/// Power-law STDP synapse parameters
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapseConfig {
    pub tau_plus: f64,
    pub lambda: f64,
    pub alpha: f64,
    pub mu: f64,
    pub weight: f64,
    pub delay_ms: f64,
    /// Post-synaptic depression time constant, held by the target neuron
    pub tau_minus: f64,
}

impl Default for SynapseConfig {
    fn default() -> Self {
        Self {
            tau_plus: 20.0,
            lambda: 0.1,
            alpha: 1.0,
            mu: 0.4,
            weight: 1.0,
            delay_ms: 1.0,
            tau_minus: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` level or `EnvFilter` directive
    pub level: String,
    /// `pretty`, `compact` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
