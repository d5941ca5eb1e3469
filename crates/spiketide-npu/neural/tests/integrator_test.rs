// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the spike-response neuron integrator
//!
//! These drive the neuron through its public surface only.

use spiketide_npu_neural::*;

fn grid(h: f64) -> TimeGrid {
    TimeGrid::new(h).unwrap()
}

fn current_pulse_train(neuron: &mut ChsNeuron, steps: u64, current: f64) {
    for stamp in 0..steps {
        neuron
            .handle(&Event::Current(CurrentEvent {
                stamp,
                current,
                weight: 1.0,
                delay_steps: 1,
                receptor: 0,
                sender: NeuronId(99),
            }))
            .unwrap();
    }
}

#[test]
fn test_psp_decays_to_rest_as_analytic_exponential() {
    let params = ChsParameters::default();
    let h = 0.1;
    let p = Propagators::calibrate(&params, &grid(h)).unwrap();

    let v0 = 0.8;
    let mut state = ChsState {
        v_syn: v0,
        ..Default::default()
    };
    let mut previous = f64::INFINITY;
    for n in 1..=1000u32 {
        state = state.advance(&p, &params, StepInput::default()).state;
        let analytic = v0 * (-(n as f64) * h / params.tau_epsp).exp();
        let rel = ((state.v_m - analytic) / analytic).abs();
        assert!(rel < 1e-9, "step {}: relative error {}", n, rel);
        assert!(state.v_m < previous && state.v_m > 0.0);
        previous = state.v_m;
    }
}

#[test]
fn test_spike_waveform_recovers_monotonically() {
    let params = ChsParameters::default();
    let h = 0.1;
    let p = Propagators::calibrate(&params, &grid(h)).unwrap();

    let v0 = -params.u_reset;
    let mut state = ChsState {
        v_spike: v0,
        ..Default::default()
    };
    let mut previous = f64::NEG_INFINITY;
    for n in 1..=1000u32 {
        state = state.advance(&p, &params, StepInput::default()).state;
        // V_m sees the waveform before this step's decay is applied
        let analytic = v0 * (-((n - 1) as f64) * h / params.tau_reset).exp();
        let rel = ((state.v_m - analytic) / analytic).abs();
        assert!(rel < 1e-9, "step {}: relative error {}", n, rel);
        assert!(state.v_m >= previous && state.v_m < 0.0);
        previous = state.v_m;
    }
}

#[test]
fn test_exact_integration_is_step_size_independent() {
    let params = ChsParameters::default();
    let fine = Propagators::calibrate(&params, &grid(0.1)).unwrap();
    let coarse = Propagators::calibrate(&params, &grid(1.0)).unwrap();

    let start = ChsState {
        i_syn_ex: 1.0,
        v_syn: 0.3,
        v_spike: -1.0,
        v_m: 0.0,
    };
    let mut a = start;
    for _ in 0..10 {
        a = a.advance(&fine, &params, StepInput::default()).state;
    }
    let b = start.advance(&coarse, &params, StepInput::default()).state;

    assert!((a.i_syn_ex - b.i_syn_ex).abs() < 1e-12);
    assert!((a.v_syn - b.v_syn).abs() < 1e-12);
    assert!((a.v_spike - b.v_spike).abs() < 1e-12);
}

#[test]
fn test_noise_consumed_in_order_then_exhausted() {
    let noise = vec![0.5, -1.0, 2.0, 0.25, 3.0];
    let mut neuron = ChsNeuron::new(NeuronId(1), grid(0.1)).unwrap();
    neuron
        .set_status(&NeuronStatusUpdate {
            u_noise: Some(0.1),
            noise: Some(noise.clone()),
            ..Default::default()
        })
        .unwrap();

    for (step, value) in noise.iter().enumerate() {
        let spike = neuron.step(step as u64).unwrap();
        assert!(spike.is_none());
        assert!((neuron.v_m() - 0.1 * value).abs() < 1e-15);
        assert_eq!(neuron.noise().cursor(), step + 1);
    }

    let before = neuron.status();
    let err = neuron.step(noise.len() as u64).unwrap_err();
    assert_eq!(
        err,
        NeuralError::NoiseExhausted {
            step: 5,
            available: 5
        }
    );
    assert_eq!(neuron.status(), before);
}

#[test]
fn test_exhaustion_keeps_spikes_of_completed_steps() {
    let mut neuron = ChsNeuron::new(NeuronId(1), grid(0.1)).unwrap();
    neuron
        .set_status(&NeuronStatusUpdate {
            u_noise: Some(1.0),
            noise: Some(vec![0.0, 5.0, 0.0]),
            ..Default::default()
        })
        .unwrap();

    let mut sink = Vec::new();
    let result = neuron.update(0, 0, 10, &mut sink);
    assert!(matches!(result, Err(NeuralError::NoiseExhausted { step: 3, .. })));
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].stamp, 2);
}

#[test]
fn test_threshold_crossing_after_exactly_k_steps() {
    let h = 0.1;
    let k: u64 = 20;
    let params = ChsParameters::default();
    let a = (-h / params.tau_epsp).exp();
    // constant unit current: V_m(n) = tau / C * (1 - a^n)
    let v = |n: u64| params.tau_epsp / params.c_m * (1.0 - a.powi(n as i32));
    let threshold = 0.5 * (v(k - 1) + v(k));

    let mut neuron = ChsNeuron::new(NeuronId(7), grid(h)).unwrap();
    neuron
        .set_status(&NeuronStatusUpdate {
            u_th: Some(threshold),
            ..Default::default()
        })
        .unwrap();
    current_pulse_train(&mut neuron, k, 1.0);

    let mut sink = Vec::new();
    neuron.update(0, 0, k - 1, &mut sink).unwrap();
    assert!(sink.is_empty(), "fired early at {:?}", sink);
    assert!(neuron.v_m() < threshold);

    neuron.update(0, k - 1, k, &mut sink).unwrap();
    assert_eq!(sink.len(), 1);
    let spike = &sink[0];
    assert_eq!(spike.stamp, k);
    assert_eq!(spike.sender, NeuronId(7));
    assert!((spike.stamp_ms(&neuron.grid()) - k as f64 * h).abs() < 1e-12);
    assert_eq!(neuron.state().v_spike, -params.u_reset);
    // the reset does not touch V_m itself
    assert!(neuron.v_m() >= threshold);
}

#[test]
fn test_spike_input_reaches_archive_and_grid() {
    let mut neuron = ChsNeuron::new(NeuronId(3), grid(0.25)).unwrap();
    neuron.register_stdp_connection(-1.0);

    let mut kick = SpikeEvent::new(NeuronId(0), 0);
    kick.weight = 5.0;
    neuron.handle(&Event::Spike(kick)).unwrap();

    let mut sink = Vec::new();
    neuron.update(0, 0, 40, &mut sink).unwrap();
    assert!(!sink.is_empty());
    for spike in &sink {
        let t = spike.stamp_ms(&neuron.grid());
        assert_eq!(t, spike.stamp as f64 * 0.25);
    }
    let archived: Vec<f64> = neuron.history(-1.0, 100.0).map(|e| e.t).collect();
    let emitted: Vec<f64> = sink.iter().map(|s| s.stamp_ms(&neuron.grid())).collect();
    assert_eq!(archived, emitted);
}

#[test]
fn test_invalid_update_reports_field() {
    let mut neuron = ChsNeuron::new(NeuronId(1), grid(0.1)).unwrap();
    let err = neuron
        .set_status(&NeuronStatusUpdate {
            tau_epsp: Some(0.0),
            ..Default::default()
        })
        .unwrap_err();
    match err {
        NeuralError::InvalidParameter { field, .. } => assert_eq!(field, "tau_epsp"),
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(neuron.parameters().tau_epsp, 8.5);
}
