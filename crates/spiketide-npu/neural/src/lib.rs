// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Spiketide Developers
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Spiketide Neural Computation
//!
//! Everything the post-synaptic side of a plastic connection needs:
//! - **Types**: ids, the simulation time grid, the event union, errors
//! - **Models**: the Carandini-Horton-Sincich (2007) spike-response neuron,
//!   integrated exactly on the time grid
//! - **Buffer**: per-step input accumulation for delayed events
//! - **Noise**: externally prepared noise signal bundled with its read cursor
//! - **Archive**: post-synaptic spike history and depression trace consumed
//!   by STDP synapses
//!
//! ## Time convention
//! Updating step `s` advances the state from `s * h` to `(s + 1) * h`.
//! Spikes emitted during that update are stamped `s + 1`, so spike times are
//! always multiples of the resolution `h`.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Core type definitions
pub mod types;

pub mod archive;
pub mod buffer;
pub mod noise;

// Neuron models
pub mod models;

// Re-export types
pub use types::{
    CurrentEvent, Event, EventKind, NeuralError, NeuronId, Port, ReceptorSpec, Result,
    SpikeEvent, TimeGrid,
};

pub use archive::{HistoryEntry, HistoryWindow, SpikeArchive, SpikeHistory};
pub use buffer::RingBuffer;
pub use noise::NoiseSource;

// Re-export neuron models
pub use models::{
    ChsNeuron, ChsParameters, ChsState, ModelParameters, NeuronModel, NeuronStatus,
    NeuronStatusUpdate, Node, Propagators, SpikeSource, SpikeTarget, StepInput, StepOutcome,
};
