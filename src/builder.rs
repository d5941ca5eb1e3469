// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Turn a validated [`SpiketideConfig`] into live model objects

use rand::rngs::StdRng;
use rand::SeedableRng;
use spiketide_config::{NeuronConfig, SpiketideConfig};
use spiketide_npu_neural::{
    ChsNeuron, ChsParameters, NeuronId, NeuronStatusUpdate, NoiseSource, Port, SpikeSource,
    SpikeTarget, TimeGrid,
};
use spiketide_npu_plasticity::{StdpPlCommonProperties, StdpPlConnection};

use crate::Result;

pub fn time_grid(config: &SpiketideConfig) -> Result<TimeGrid> {
    Ok(TimeGrid::new(config.simulation.resolution_ms)?)
}

pub fn neuron_parameters(neuron: &NeuronConfig) -> ChsParameters {
    ChsParameters {
        tau_epsp: neuron.tau_epsp,
        tau_reset: neuron.tau_reset,
        e_l: neuron.e_l,
        u_th: neuron.u_th,
        u_epsp: neuron.u_epsp,
        u_reset: neuron.u_reset,
        c_m: neuron.c_m,
        u_noise: neuron.u_noise,
    }
}

/// Build neuron `id` from the `[neuron]` section.
///
/// With `noise_length > 0` the neuron gets its own Gaussian noise sequence,
/// seeded from `[simulation].seed` and the neuron id.
pub fn build_neuron(config: &SpiketideConfig, id: NeuronId) -> Result<ChsNeuron> {
    let grid = time_grid(config)?;
    let noise = if config.neuron.noise_length > 0 {
        let mut rng = StdRng::seed_from_u64(config.simulation.seed ^ u64::from(id.0));
        NoiseSource::gaussian(config.neuron.noise_length, &mut rng)
    } else {
        NoiseSource::default()
    };

    let mut neuron =
        ChsNeuron::with_parameters(id, grid, neuron_parameters(&config.neuron), noise)?;
    neuron.set_status(&NeuronStatusUpdate {
        tau_minus: Some(config.synapse.tau_minus),
        ..Default::default()
    })?;

    tracing::debug!(
        target: "spiketide-neural",
        neuron = %id,
        noise_length = config.neuron.noise_length,
        "neuron built from configuration"
    );
    Ok(neuron)
}

/// Shared STDP properties plus the initial state of every new connection
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseModel {
    pub common: StdpPlCommonProperties,
    pub template: StdpPlConnection,
    pub grid: TimeGrid,
}

impl SynapseModel {
    /// Create a connection `sender -> receiver` from the template.
    pub fn connect<S, T>(
        &self,
        sender: &S,
        receiver: &mut T,
        receptor: Port,
        t_lastspike: f64,
    ) -> Result<StdpPlConnection>
    where
        S: SpikeSource + ?Sized,
        T: SpikeTarget + ?Sized,
    {
        let mut connection = self.template.clone();
        connection.check_connection(sender, receiver, receptor, t_lastspike, &self.grid)?;
        Ok(connection)
    }
}

pub fn build_synapse_model(config: &SpiketideConfig) -> Result<SynapseModel> {
    let grid = time_grid(config)?;
    let synapse = &config.synapse;

    let common = StdpPlCommonProperties {
        tau_plus: synapse.tau_plus,
        lambda: synapse.lambda,
        alpha: synapse.alpha,
        mu: synapse.mu,
    };
    common.validate()?;

    let template = StdpPlConnection::new(synapse.weight, grid.ms_to_steps(synapse.delay_ms))?;

    Ok(SynapseModel {
        common,
        template,
        grid,
    })
}
