// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Status dictionary surface
//!
//! `NeuronStatus` is what a host reads back; `NeuronStatusUpdate` is a partial
//! write where every absent field keeps its current value. Keys follow the
//! conventional names (`tau_epsp`, `U_th`, `noise`, ...).

/// Snapshot of a neuron's parameters and observable state
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "std", derive(serde::Serialize))]
pub struct NeuronStatus {
    pub tau_epsp: f64,
    pub tau_reset: f64,
    #[cfg_attr(feature = "std", serde(rename = "E_L"))]
    pub e_l: f64,
    #[cfg_attr(feature = "std", serde(rename = "U_th"))]
    pub u_th: f64,
    #[cfg_attr(feature = "std", serde(rename = "U_epsp"))]
    pub u_epsp: f64,
    #[cfg_attr(feature = "std", serde(rename = "U_reset"))]
    pub u_reset: f64,
    #[cfg_attr(feature = "std", serde(rename = "C_m"))]
    pub c_m: f64,
    #[cfg_attr(feature = "std", serde(rename = "U_noise"))]
    pub u_noise: f64,
    pub noise: Vec<f64>,
    /// Absolute membrane potential, `V_m + E_L`
    #[cfg_attr(feature = "std", serde(rename = "V_m"))]
    pub v_m: f64,
    pub tau_minus: f64,
    /// Next noise index to be read
    pub noise_position: usize,
}

/// Partial status write, committed atomically by `ChsNeuron::set_status`
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "std",
    derive(serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct NeuronStatusUpdate {
    pub tau_epsp: Option<f64>,
    pub tau_reset: Option<f64>,
    #[cfg_attr(feature = "std", serde(rename = "E_L"))]
    pub e_l: Option<f64>,
    #[cfg_attr(feature = "std", serde(rename = "U_th"))]
    pub u_th: Option<f64>,
    #[cfg_attr(feature = "std", serde(rename = "U_epsp"))]
    pub u_epsp: Option<f64>,
    #[cfg_attr(feature = "std", serde(rename = "U_reset"))]
    pub u_reset: Option<f64>,
    #[cfg_attr(feature = "std", serde(rename = "C_m"))]
    pub c_m: Option<f64>,
    #[cfg_attr(feature = "std", serde(rename = "U_noise"))]
    pub u_noise: Option<f64>,
    /// Replacing the noise signal rewinds its cursor
    pub noise: Option<Vec<f64>>,
    /// Absolute membrane potential
    #[cfg_attr(feature = "std", serde(rename = "V_m"))]
    pub v_m: Option<f64>,
    pub tau_minus: Option<f64>,
}

impl NeuronStatusUpdate {
    /// True when the update touches anything that feeds the propagators
    pub fn affects_propagators(&self) -> bool {
        self.tau_epsp.is_some()
            || self.tau_reset.is_some()
            || self.u_epsp.is_some()
            || self.c_m.is_some()
    }
}
