// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Spiketide Developers
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spiketide
//!
//! Computational core for an event-driven spiking-network simulator:
//! - an exactly integrated spike-response neuron
//!   (Carandini, Horton & Sincich 2007), and
//! - a plastic synapse with power-law spike-timing dependent plasticity
//!   (Morrison, Aertsen & Diesmann 2007).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spiketide::prelude::*;
//!
//! let config = spiketide::config::load_config(None, None)?;
//! spiketide::config::validate_config(&config)?;
//!
//! let trace = spiketide::pair::run_pair(&config, &PairDrive::default())?;
//! println!("final weight: {}", trace.final_weight);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  spiketide-npu-neural                                │
//! │  (time grid, events, neuron, noise, spike archive)   │
//! └──────────────────────────────────────────────────────┘
//!                          ↓
//! ┌──────────────────────────────────────────────────────┐
//! │  spiketide-npu-plasticity                            │
//! │  (power-law STDP connection)                         │
//! └──────────────────────────────────────────────────────┘
//!                          ↓
//! ┌──────────────────────────────────────────────────────┐
//! │  spiketide (this crate)                              │
//! │  (config -> model builders, pair driver)             │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! `spiketide-config` and `spiketide-observability` are cross-cutting.

pub use spiketide_config as config;
pub use spiketide_npu_neural as neural;
pub use spiketide_npu_plasticity as plasticity;
pub use spiketide_observability as observability;

pub mod builder;
pub mod pair;

pub use builder::{build_neuron, build_synapse_model, time_grid, SynapseModel};

/// Errors surfaced by the umbrella helpers
#[derive(Debug, thiserror::Error)]
pub enum SpiketideError {
    #[error(transparent)]
    Config(#[from] spiketide_config::ConfigError),

    #[error(transparent)]
    Neural(#[from] spiketide_npu_neural::NeuralError),

    #[error(transparent)]
    Plasticity(#[from] spiketide_npu_plasticity::PlasticityError),
}

pub type Result<T> = std::result::Result<T, SpiketideError>;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::SpiketideConfig;
    pub use crate::neural::{
        ChsNeuron, ChsParameters, CurrentEvent, Event, EventKind, NeuralError, NeuronId,
        NeuronModel, NeuronStatusUpdate, NoiseSource, Node, SpikeEvent, SpikeHistory,
        SpikeSource, SpikeTarget, TimeGrid,
    };
    pub use crate::pair::{PairDrive, PairTrace};
    pub use crate::plasticity::{
        ConnectionStatusUpdate, PlasticityError, StdpPlCommonProperties, StdpPlConnection,
    };
    pub use crate::{SpiketideError, SynapseModel};
}
