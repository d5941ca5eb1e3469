// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Core type definitions shared by the neuron and synapse crates.

pub mod error;
pub mod event;
pub mod ids;
pub mod time;

// Re-export commonly used types
pub use error::{NeuralError, Result};
pub use event::{CurrentEvent, Event, EventKind, ReceptorSpec, SpikeEvent};
pub use ids::{NeuronId, Port};
pub use time::TimeGrid;
