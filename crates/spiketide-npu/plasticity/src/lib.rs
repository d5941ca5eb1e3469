// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Spiketide Developers
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spiketide Plasticity Module
//!
//! Spike-timing dependent plasticity with power-law weight dependence
//! (Morrison et al. 2007), homogeneous variant: all synapses of the type
//! share one set of [`StdpPlCommonProperties`].
//!
//! ## Architecture
//! - `rule`: pure facilitation / depression / trace functions
//! - `common`: shared properties with validated status updates
//! - `connection`: per-synapse weight and pre-synaptic trace, connection
//!   setup and the `send` path
//!
//! The post-synaptic side is reached only through the read-only
//! `SpikeHistory` capability of the target neuron.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod common;
pub mod connection;
pub mod error;
pub mod rule;

// Re-export key types
pub use common::{StdpPlCommonProperties, StdpPlCommonStatusUpdate};
pub use connection::{ConnectionStatus, ConnectionStatusUpdate, StdpPlConnection};
pub use error::{PlasticityError, Result};
pub use rule::{decay_trace, depress, facilitate};
