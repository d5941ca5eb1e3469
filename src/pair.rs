// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Two neurons joined by one plastic connection
//!
//! A minimal stand-in for the host scheduler: both neurons receive a constant
//! current, the pre-synaptic neuron's spikes travel through the STDP
//! connection and the weight is traced at every transmission.

use spiketide_config::SpiketideConfig;
use spiketide_npu_neural::{ChsNeuron, CurrentEvent, Event, NeuronId, NeuronModel, Node};

use crate::builder::{build_neuron, build_synapse_model};
use crate::Result;

pub const PRE: NeuronId = NeuronId(0);
pub const POST: NeuronId = NeuronId(1);

/// Constant drive of both neurons (current units, per step)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairDrive {
    pub pre_current: f64,
    pub post_current: f64,
}

impl Default for PairDrive {
    fn default() -> Self {
        Self {
            pre_current: 0.3,
            post_current: 0.25,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PairTrace {
    /// Pre-synaptic spike times (ms)
    pub pre_spikes: Vec<f64>,
    /// Post-synaptic spike times (ms)
    pub post_spikes: Vec<f64>,
    /// `(t_spike, weight)` after every transmission
    pub weights: Vec<(f64, f64)>,
    pub final_weight: f64,
}

fn inject(neuron: &mut ChsNeuron, step: u64, current: f64) -> Result<()> {
    if current != 0.0 {
        let sender = neuron.node_id();
        neuron.handle(&Event::Current(CurrentEvent {
            stamp: step,
            current,
            weight: 1.0,
            delay_steps: 1,
            receptor: 0,
            sender,
        }))?;
    }
    Ok(())
}

/// Run `[simulation].steps` steps of the pair.
pub fn run_pair(config: &SpiketideConfig, drive: &PairDrive) -> Result<PairTrace> {
    let mut pre = build_neuron(config, PRE)?;
    let mut post = build_neuron(config, POST)?;
    let model = build_synapse_model(config)?;
    let mut connection = model.connect(&pre, &mut post, 0, 0.0)?;
    let grid = model.grid;

    let mut trace = PairTrace::default();
    for step in 0..config.simulation.steps {
        inject(&mut pre, step, drive.pre_current)?;
        inject(&mut post, step, drive.post_current)?;

        if let Some(spike) = pre.step(step)? {
            let t_spike = spike.stamp_ms(&grid);
            let delivered = connection.transmit(&spike, &post, &model.common, &grid)?;
            trace.pre_spikes.push(t_spike);
            trace.weights.push((t_spike, delivered.weight));
            post.handle(&Event::Spike(delivered))?;
        }
        if let Some(spike) = post.step(step)? {
            trace.post_spikes.push(spike.stamp_ms(&grid));
        }
    }
    trace.final_weight = connection.weight();

    tracing::info!(
        target: "spiketide-plasticity",
        pre_spikes = trace.pre_spikes.len(),
        post_spikes = trace.post_spikes.len(),
        final_weight = trace.final_weight,
        "pair run finished"
    );
    Ok(trace)
}
