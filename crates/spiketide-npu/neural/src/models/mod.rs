// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Spiketide Developers
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Model Architecture
//!
//! Trait-based model seam plus the models shipped with the crate.
//!
//! ## Adding a New Neuron Model
//!
//! 1. Create `src/models/your_model/`
//! 2. Implement `ModelParameters` for its parameters and `NeuronModel` for the node
//! 3. Implement `SpikeTarget` if it can receive plastic connections
//! 4. Add tests
//! 5. Export in `mod.rs`

pub mod chs2007;
pub mod traits;

// Re-export core types
pub use chs2007::{
    ChsNeuron, ChsParameters, ChsState, NeuronStatus, NeuronStatusUpdate, Propagators,
    StepInput, StepOutcome,
};
pub use traits::{ModelParameters, NeuronModel, Node, SpikeSource, SpikeTarget};
