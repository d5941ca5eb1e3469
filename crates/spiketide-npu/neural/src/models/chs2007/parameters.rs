// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Independent parameters of the spike-response neuron

use super::status::NeuronStatusUpdate;
use crate::models::traits::ModelParameters;
use crate::types::{NeuralError, Result};

/// Model parameters. Amplitudes are normalized so that `E_L = 0`, `U_th = 1`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct ChsParameters {
    /// EPSP time-to-peak (ms)
    pub tau_epsp: f64,

    /// Recovery time constant of the after-hyperpolarization (ms)
    pub tau_reset: f64,

    /// Resting potential
    #[cfg_attr(feature = "std", serde(rename = "E_L"))]
    pub e_l: f64,

    /// Threshold, relative to `E_L`
    #[cfg_attr(feature = "std", serde(rename = "U_th"))]
    pub u_th: f64,

    /// Maximum EPSP amplitude for unit weight
    #[cfg_attr(feature = "std", serde(rename = "U_epsp"))]
    pub u_epsp: f64,

    /// Magnitude of the reset / after-hyperpolarization
    #[cfg_attr(feature = "std", serde(rename = "U_reset"))]
    pub u_reset: f64,

    /// Capacitance seen by injected currents
    #[cfg_attr(feature = "std", serde(rename = "C_m"))]
    pub c_m: f64,

    /// Noise scale
    #[cfg_attr(feature = "std", serde(rename = "U_noise"))]
    pub u_noise: f64,
}

impl Default for ChsParameters {
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
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(NeuralError::invalid(
            field,
            format!("must be > 0, got {}", value),
        ));
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(NeuralError::invalid(
            field,
            format!("must be finite, got {}", value),
        ));
    }
    Ok(())
}

impl ChsParameters {
    /// Candidate parameters with the scalar fields of `update` applied.
    ///
    /// `self` is left untouched; the candidate is validated before return.
    pub fn with_update(&self, update: &NeuronStatusUpdate) -> Result<Self> {
        let mut candidate = self.clone();
        if let Some(v) = update.tau_epsp {
            candidate.tau_epsp = v;
        }
        if let Some(v) = update.tau_reset {
            candidate.tau_reset = v;
        }
        if let Some(v) = update.e_l {
            candidate.e_l = v;
        }
        if let Some(v) = update.u_th {
            candidate.u_th = v;
        }
        if let Some(v) = update.u_epsp {
            candidate.u_epsp = v;
        }
        if let Some(v) = update.u_reset {
            candidate.u_reset = v;
        }
        if let Some(v) = update.c_m {
            candidate.c_m = v;
        }
        if let Some(v) = update.u_noise {
            candidate.u_noise = v;
        }
        candidate.validate()?;
        Ok(candidate)
    }
}

impl ModelParameters for ChsParameters {
    fn validate(&self) -> Result<()> {
        positive("tau_epsp", self.tau_epsp)?;
        positive("tau_reset", self.tau_reset)?;
        positive("C_m", self.c_m)?;
        finite("E_L", self.e_l)?;
        finite("U_th", self.u_th)?;
        finite("U_epsp", self.u_epsp)?;
        finite("U_reset", self.u_reset)?;
        finite("U_noise", self.u_noise)?;
        Ok(())
    }
}
