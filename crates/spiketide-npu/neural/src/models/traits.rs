// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Traits at the seam between neuron models, the step driver and synapses

use crate::archive::SpikeHistory;
use crate::types::{Event, EventKind, NeuronId, Port, ReceptorSpec, Result, SpikeEvent, TimeGrid};

/// Parameters of a neuron model
pub trait ModelParameters: Clone {
    /// Check every field; the first violation is reported with its field name.
    fn validate(&self) -> Result<()>;
}

/// Anything addressable in the simulation
pub trait Node {
    fn node_id(&self) -> NeuronId;

    fn model_name(&self) -> &'static str;
}

/// A node driven once per global step by the host scheduler
pub trait NeuronModel: Node {
    type Parameters: ModelParameters;

    fn parameters(&self) -> &Self::Parameters;

    /// Event kinds and receptor ports this model accepts
    fn receptor_table(&self) -> &'static [ReceptorSpec];

    /// Recompute everything derived from parameters and step size.
    fn calibrate(&mut self, grid: TimeGrid) -> Result<()>;

    /// Buffer an incoming event for the step at which it takes effect.
    fn handle(&mut self, event: &Event) -> Result<()>;

    /// Advance steps `origin + from .. origin + to`, pushing emitted spikes
    /// into `sink`. Spikes of steps completed before a failure stay in `sink`.
    fn update(&mut self, origin: u64, from: u64, to: u64, sink: &mut Vec<SpikeEvent>)
        -> Result<()>;
}

/// A node that emits events of one kind
pub trait SpikeSource: Node {
    fn sends(&self) -> EventKind {
        EventKind::Spike
    }
}

/// A node that can terminate STDP connections.
///
/// Synapses only see the read-only [`SpikeHistory`] side while sending;
/// registration happens once, at connection setup.
pub trait SpikeTarget: Node + SpikeHistory {
    /// Validate `(kind, receptor)` and return the receptor port to store.
    fn connect_sender(&self, kind: EventKind, receptor: Port) -> Result<Port>;

    fn register_stdp_connection(&mut self, t_first_read: f64);
}
