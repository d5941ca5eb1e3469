// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! The neuron node: parameters, state, buffers, noise and spike archive

use super::parameters::ChsParameters;
use super::propagator::Propagators;
use super::state::{ChsState, StepInput};
use super::status::{NeuronStatus, NeuronStatusUpdate};
use super::MODEL_NAME;
use crate::archive::{HistoryWindow, SpikeArchive, SpikeHistory};
use crate::buffer::RingBuffer;
use crate::models::traits::{ModelParameters, NeuronModel, Node, SpikeSource, SpikeTarget};
use crate::noise::NoiseSource;
use crate::types::{
    Event, EventKind, NeuralError, NeuronId, Port, ReceptorSpec, Result, SpikeEvent, TimeGrid,
};

const RECEPTORS: &[ReceptorSpec] = &[
    ReceptorSpec {
        kind: EventKind::Spike,
        receptors: &[0],
    },
    ReceptorSpec {
        kind: EventKind::Current,
        receptors: &[0],
    },
];

/// Validated replacement for the live pieces of a neuron
struct Candidate {
    params: ChsParameters,
    propagators: Propagators,
    noise: Option<NoiseSource>,
    state: ChsState,
    archive: SpikeArchive,
}

#[derive(Debug, Clone)]
pub struct ChsNeuron {
    id: NeuronId,
    grid: TimeGrid,
    params: ChsParameters,
    state: ChsState,
    noise: NoiseSource,
    propagators: Propagators,
    spikes_ex: RingBuffer,
    currents: RingBuffer,
    archive: SpikeArchive,
}

impl ChsNeuron {
    /// Neuron with default parameters and no noise
    pub fn new(id: NeuronId, grid: TimeGrid) -> Result<Self> {
        Self::with_parameters(id, grid, ChsParameters::default(), NoiseSource::default())
    }

    pub fn with_parameters(
        id: NeuronId,
        grid: TimeGrid,
        params: ChsParameters,
        noise: NoiseSource,
    ) -> Result<Self> {
        let propagators = Propagators::calibrate(&params, &grid)?;
        Ok(Self {
            id,
            grid,
            params,
            state: ChsState::default(),
            noise,
            propagators,
            spikes_ex: RingBuffer::new(),
            currents: RingBuffer::new(),
            archive: SpikeArchive::default(),
        })
    }

    /// Advance a single step (`step -> step + 1`).
    ///
    /// Returns the emitted spike, stamped `step + 1`. On failure nothing is
    /// mutated: neither state, buffers nor the noise cursor.
    pub fn step(&mut self, step: u64) -> Result<Option<SpikeEvent>> {
        let noise = self.noise.peek(step).map_err(|err| {
            tracing::error!(target: "spiketide-neural", neuron = %self.id, step, "{}", err);
            err
        })?;

        let arrival = step + 1;
        let input = StepInput {
            spike_input: self.spikes_ex.take_value(arrival),
            current: self.currents.take_value(arrival),
            noise,
        };

        let outcome = self.state.advance(&self.propagators, &self.params, input);
        self.state = outcome.state;
        if noise.is_some() {
            self.noise.advance();
        }

        if !outcome.spiked {
            return Ok(None);
        }

        let t_spike = self.grid.steps_to_ms(arrival);
        self.archive.record_spike(t_spike);
        tracing::trace!(
            target: "spiketide-neural",
            neuron = %self.id,
            stamp = arrival,
            t_spike,
            v_m = self.state.v_m,
            "spike"
        );
        Ok(Some(SpikeEvent::new(self.id, arrival)))
    }

    /// Replace parameters and/or state atomically.
    ///
    /// A candidate of every affected piece (parameters, propagators, noise,
    /// state, archive) is built and validated first; the live neuron is only
    /// touched once all of them succeeded.
    pub fn set_status(&mut self, update: &NeuronStatusUpdate) -> Result<()> {
        match self.build_candidate(update) {
            Ok(candidate) => {
                self.params = candidate.params;
                self.propagators = candidate.propagators;
                if let Some(noise) = candidate.noise {
                    self.noise = noise;
                }
                self.state = candidate.state;
                self.archive = candidate.archive;
                tracing::debug!(target: "spiketide-neural", neuron = %self.id, "status committed");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    target: "spiketide-neural",
                    neuron = %self.id,
                    "status update rejected: {}",
                    err
                );
                Err(err)
            }
        }
    }

    fn build_candidate(&self, update: &NeuronStatusUpdate) -> Result<Candidate> {
        let params = self.params.with_update(update)?;
        let propagators = if update.affects_propagators() {
            Propagators::calibrate(&params, &self.grid)?
        } else {
            self.propagators
        };

        let noise = match &update.noise {
            Some(sequence) => Some(NoiseSource::new(sequence.clone())?),
            None => None,
        };

        let mut state = self.state;
        if let Some(v_m) = update.v_m {
            if !v_m.is_finite() {
                return Err(NeuralError::InvalidParameter {
                    field: "V_m",
                    reason: format!("must be finite, got {}", v_m),
                });
            }
            state.v_m = v_m - params.e_l;
        }

        let archive = match update.tau_minus {
            Some(tau_minus) => self.archive.with_tau_minus(tau_minus)?,
            None => self.archive.clone(),
        };

        Ok(Candidate {
            params,
            propagators,
            noise,
            state,
            archive,
        })
    }

    /// Apply a status dictionary given as JSON
    #[cfg(feature = "std")]
    pub fn set_status_json(&mut self, value: serde_json::Value) -> Result<()> {
        let update: NeuronStatusUpdate =
            serde_json::from_value(value).map_err(|err| NeuralError::InvalidParameter {
                field: "status",
                reason: err.to_string(),
            })?;
        self.set_status(&update)
    }

    pub fn status(&self) -> NeuronStatus {
        NeuronStatus {
            tau_epsp: self.params.tau_epsp,
            tau_reset: self.params.tau_reset,
            e_l: self.params.e_l,
            u_th: self.params.u_th,
            u_epsp: self.params.u_epsp,
            u_reset: self.params.u_reset,
            c_m: self.params.c_m,
            u_noise: self.params.u_noise,
            noise: self.noise.sequence().to_vec(),
            v_m: self.v_m(),
            tau_minus: self.archive.tau_minus(),
            noise_position: self.noise.cursor(),
        }
    }

    /// Absolute membrane potential
    #[inline]
    pub fn v_m(&self) -> f64 {
        self.state.v_m + self.params.e_l
    }

    #[inline]
    pub fn state(&self) -> &ChsState {
        &self.state
    }

    #[inline]
    pub fn propagators(&self) -> &Propagators {
        &self.propagators
    }

    #[inline]
    pub fn grid(&self) -> TimeGrid {
        self.grid
    }

    #[inline]
    pub fn noise(&self) -> &NoiseSource {
        &self.noise
    }

    #[inline]
    pub fn archive(&self) -> &SpikeArchive {
        &self.archive
    }

    /// Return to step 0: state, buffers, archive history and noise cursor
    /// are reset; parameters and the noise sequence are kept.
    pub fn reset_state(&mut self) {
        self.state = ChsState::default();
        self.spikes_ex.reset(0);
        self.currents.reset(0);
        self.archive.clear_history();
        self.noise.rewind();
    }
}

impl Node for ChsNeuron {
    fn node_id(&self) -> NeuronId {
        self.id
    }

    fn model_name(&self) -> &'static str {
        MODEL_NAME
    }
}

impl NeuronModel for ChsNeuron {
    type Parameters = ChsParameters;

    fn parameters(&self) -> &ChsParameters {
        &self.params
    }

    fn receptor_table(&self) -> &'static [ReceptorSpec] {
        RECEPTORS
    }

    fn calibrate(&mut self, grid: TimeGrid) -> Result<()> {
        self.params.validate()?;
        self.propagators = Propagators::calibrate(&self.params, &grid)?;
        self.grid = grid;
        Ok(())
    }

    fn handle(&mut self, event: &Event) -> Result<()> {
        ReceptorSpec::resolve(self.receptor_table(), event.kind(), event.receptor(), MODEL_NAME)?;
        match event {
            Event::Spike(spike) => self.spikes_ex.add_value(spike.arrival_step()?, spike.mass()),
            Event::Current(current) => self
                .currents
                .add_value(current.arrival_step()?, current.weight * current.current),
        }
    }

    fn update(
        &mut self,
        origin: u64,
        from: u64,
        to: u64,
        sink: &mut Vec<SpikeEvent>,
    ) -> Result<()> {
        for lag in from..to {
            if let Some(spike) = self.step(origin + lag)? {
                sink.push(spike);
            }
        }
        Ok(())
    }
}

impl SpikeSource for ChsNeuron {}

impl SpikeHistory for ChsNeuron {
    fn history(&self, t1: f64, t2: f64) -> HistoryWindow<'_> {
        self.archive.history(t1, t2)
    }

    fn decayed_trace_value_at(&self, t: f64) -> f64 {
        self.archive.decayed_trace_value_at(t)
    }
}

impl SpikeTarget for ChsNeuron {
    fn connect_sender(&self, kind: EventKind, receptor: Port) -> Result<Port> {
        ReceptorSpec::resolve(self.receptor_table(), kind, receptor, MODEL_NAME)
    }

    fn register_stdp_connection(&mut self, t_first_read: f64) {
        self.archive.register_stdp_connection(t_first_read);
    }
}
