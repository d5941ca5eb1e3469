// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! # Carandini-Horton-Sincich (2007) Spike-Response Neuron
//!
//! The membrane potential is the sum of stereotyped waveforms: the
//! post-synaptic potentials (`V_syn`), a spike waveform covering the reset and
//! the after-hyperpolarization (`V_spike`), and a prepared noise signal.
//!
//! ## Model Dynamics
//!
//! ```text
//! EPSP (alpha function, time-to-peak tau_epsp):
//!     di_syn/dt = -i_syn / tau_epsp
//!     dV_syn/dt = -V_syn / tau_epsp + (U_epsp * e / tau_epsp) * i_syn + I_ext / C_m
//!
//! Spike waveform:
//!     dV_spike/dt = -V_spike / tau_reset
//!
//! Membrane potential (relative to E_L):
//!     V_m = V_syn + V_spike + U_noise * noise[k]
//!
//! Firing:
//!     V_m >= U_th  =>  V_spike -= U_reset
//! ```
//!
//! The linear subthreshold system is integrated exactly on the time grid.
//! The reset is additive: `V_m` is never clamped and there is no refractory
//! period beyond the waveform itself.

pub mod neuron;
pub mod parameters;
pub mod propagator;
pub mod state;
pub mod status;

pub use neuron::ChsNeuron;
pub use parameters::ChsParameters;
pub use propagator::Propagators;
pub use state::{ChsState, StepInput, StepOutcome};
pub use status::{NeuronStatus, NeuronStatusUpdate};

/// Model name reported in errors and logs
pub const MODEL_NAME: &str = "iaf_chs_2007";
