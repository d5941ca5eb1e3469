// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! State variables and the single-step transition

use super::parameters::ChsParameters;
use super::propagator::Propagators;

/// State of one neuron. All potentials are relative to `E_L`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChsState {
    /// Post-synaptic current from excitatory spikes
    pub i_syn_ex: f64,
    /// PSP waveform
    pub v_syn: f64,
    /// Spike / after-hyperpolarization waveform
    pub v_spike: f64,
    /// Membrane potential
    pub v_m: f64,
}

/// Input consumed by one step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepInput {
    /// Spike mass arriving at the end of this step
    pub spike_input: f64,
    /// Current injected during this step
    pub current: f64,
    /// Noise sample for this step, `None` when noise is disabled
    pub noise: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub state: ChsState,
    pub spiked: bool,
}

impl ChsState {
    /// Advance one step. Pure: `self` is not modified.
    ///
    /// `V_syn` is propagated from the old `i_syn`, then the arriving spike
    /// mass is added to `i_syn`, so input affects `V_syn` from the next step
    /// on. `V_m` sums the new `V_syn` with the old `V_spike`, and the spike
    /// waveform decays afterwards.
    #[inline]
    pub fn advance(
        &self,
        propagators: &Propagators,
        params: &ChsParameters,
        input: StepInput,
    ) -> StepOutcome {
        let v_syn = self.v_syn * propagators.p22
            + self.i_syn_ex * propagators.p21_ex
            + input.current * propagators.p20;

        let i_syn_ex = self.i_syn_ex * propagators.p11_ex + input.spike_input;

        let mut v_m = v_syn + self.v_spike;
        if let Some(noise) = input.noise {
            v_m += params.u_noise * noise;
        }

        let mut v_spike = self.v_spike * propagators.p30;

        let spiked = v_m >= params.u_th;
        if spiked {
            v_spike -= params.u_reset;
        }

        StepOutcome {
            state: ChsState {
                i_syn_ex,
                v_syn,
                v_spike,
                v_m,
            },
            spiked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimeGrid;

    fn setup() -> (Propagators, ChsParameters) {
        let params = ChsParameters::default();
        let grid = TimeGrid::new(0.1).unwrap();
        (Propagators::calibrate(&params, &grid).unwrap(), params)
    }

    #[test]
    fn test_quiescent_state_stays_at_rest() {
        let (p, params) = setup();
        let out = ChsState::default().advance(&p, &params, StepInput::default());
        assert_eq!(out.state, ChsState::default());
        assert!(!out.spiked);
    }

    #[test]
    fn test_spike_input_affects_v_syn_one_step_later() {
        let (p, params) = setup();
        let input = StepInput {
            spike_input: 1.0,
            ..Default::default()
        };
        let first = ChsState::default().advance(&p, &params, input);
        assert_eq!(first.state.i_syn_ex, 1.0);
        assert_eq!(first.state.v_syn, 0.0);

        let second = first.state.advance(&p, &params, StepInput::default());
        assert!((second.state.v_syn - p.p21_ex).abs() < 1e-15);
    }

    #[test]
    fn test_noise_enters_v_m_only() {
        let (p, mut params) = setup();
        params.u_noise = 0.5;
        let input = StepInput {
            noise: Some(0.4),
            ..Default::default()
        };
        let out = ChsState::default().advance(&p, &params, input);
        assert!((out.state.v_m - 0.2).abs() < 1e-15);
        assert_eq!(out.state.v_syn, 0.0);

        let next = out.state.advance(&p, &params, StepInput::default());
        assert_eq!(next.state.v_m, 0.0);
    }

    #[test]
    fn test_reset_is_additive_and_keeps_v_m() {
        let (p, params) = setup();
        let state = ChsState {
            v_syn: 1.2,
            ..Default::default()
        };
        let out = state.advance(&p, &params, StepInput::default());
        assert!(out.spiked);
        assert!(out.state.v_m >= params.u_th);
        assert_eq!(out.state.v_spike, -params.u_reset);
    }
}
