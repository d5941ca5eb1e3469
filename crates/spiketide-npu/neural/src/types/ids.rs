// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Identity types for neurons and receptor ports

use core::fmt;

/// Neuron ID (unique within one simulation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeuronId(pub u32);

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Neuron({})", self.0)
    }
}

/// Receptor port on the receiving node
pub type Port = u32;
