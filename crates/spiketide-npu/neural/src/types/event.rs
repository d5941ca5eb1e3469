// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Events exchanged between nodes
//!
//! Every event kind a node can receive is a variant of [`Event`]. Receiving
//! models declare which kinds they accept on which receptor ports through a
//! static [`ReceptorSpec`] table, checked once when a connection is made.

use core::fmt;

use super::error::{NeuralError, Result};
use super::ids::{NeuronId, Port};
use super::time::TimeGrid;

/// Discriminant of [`Event`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Spike,
    Current,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventKind::Spike => "spike",
            EventKind::Current => "current",
        };
        f.write_str(name)
    }
}

/// A spike travelling from `sender` to `receiver`.
///
/// `stamp` is the grid step at which the sender fired. The spike takes effect
/// at the receiver at step `stamp + delay_steps`.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeEvent {
    pub stamp: u64,
    pub weight: f64,
    pub delay_steps: u64,
    pub receptor: Port,
    pub sender: NeuronId,
    pub receiver: Option<NeuronId>,
    pub multiplicity: u32,
}

impl SpikeEvent {
    pub fn new(sender: NeuronId, stamp: u64) -> Self {
        Self {
            stamp,
            weight: 1.0,
            delay_steps: 1,
            receptor: 0,
            sender,
            receiver: None,
            multiplicity: 1,
        }
    }

    /// Spike time in ms
    #[inline]
    pub fn stamp_ms(&self, grid: &TimeGrid) -> f64 {
        grid.steps_to_ms(self.stamp)
    }

    /// Grid step at which the receiver sees this spike
    #[inline]
    pub fn arrival_step(&self) -> Result<u64> {
        arrival(self.stamp, self.delay_steps)
    }

    /// Total input mass carried to the receiver
    #[inline]
    pub fn mass(&self) -> f64 {
        self.weight * self.multiplicity as f64
    }
}

/// A step current injected into the receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentEvent {
    pub stamp: u64,
    pub current: f64,
    pub weight: f64,
    pub delay_steps: u64,
    pub receptor: Port,
    pub sender: NeuronId,
}

impl CurrentEvent {
    #[inline]
    pub fn arrival_step(&self) -> Result<u64> {
        arrival(self.stamp, self.delay_steps)
    }
}

fn arrival(stamp: u64, delay_steps: u64) -> Result<u64> {
    stamp
        .checked_add(delay_steps)
        .ok_or_else(|| NeuralError::InvalidTime {
            field: "arrival_step",
            reason: format!("stamp {} + delay {} overflows the step counter", stamp, delay_steps),
        })
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Spike(SpikeEvent),
    Current(CurrentEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Spike(_) => EventKind::Spike,
            Event::Current(_) => EventKind::Current,
        }
    }

    pub fn receptor(&self) -> Port {
        match self {
            Event::Spike(e) => e.receptor,
            Event::Current(e) => e.receptor,
        }
    }
}

/// Receptor ports a model accepts for one event kind
#[derive(Debug, Clone, Copy)]
pub struct ReceptorSpec {
    pub kind: EventKind,
    pub receptors: &'static [Port],
}

impl ReceptorSpec {
    /// Resolve `(kind, receptor)` against a model's receptor table.
    pub fn resolve(
        table: &[ReceptorSpec],
        kind: EventKind,
        receptor: Port,
        model: &'static str,
    ) -> Result<Port> {
        let spec = table
            .iter()
            .find(|spec| spec.kind == kind)
            .ok_or(NeuralError::UnsupportedEvent { event: kind, model })?;

        if spec.receptors.contains(&receptor) {
            Ok(receptor)
        } else {
            Err(NeuralError::UnsupportedReceptor {
                receptor,
                event: kind,
                model,
            })
        }
    }
}
