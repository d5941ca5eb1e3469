// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Exact-integration propagators
//!
//! The subthreshold dynamics are linear and time-invariant, so the state after
//! one step of length `h` is an exact linear map of the state before it. The
//! five non-trivial entries of that map are computed once per calibration and
//! reused every step.
//!
//! ```text
//! P11 = P22 = exp(-h / tau_epsp)
//! P30       = exp(-h / tau_reset)
//! P21       = U_epsp * e * P11 * h / tau_epsp
//! P20       = tau_epsp / C_m * (1 - P22)
//! ```

use core::f64::consts::E;

use super::parameters::ChsParameters;
use crate::models::traits::ModelParameters;
use crate::types::{Result, TimeGrid};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Propagators {
    /// i_syn -> i_syn
    pub p11_ex: f64,
    /// i_syn -> V_syn
    pub p21_ex: f64,
    /// V_syn -> V_syn
    pub p22: f64,
    /// I_ext -> V_syn
    pub p20: f64,
    /// V_spike -> V_spike
    pub p30: f64,
}

impl Propagators {
    /// Fails with `InvalidParameter` if a time constant or `C_m` is not positive.
    pub fn calibrate(params: &ChsParameters, grid: &TimeGrid) -> Result<Self> {
        params.validate()?;
        let h = grid.resolution_ms();

        let p11_ex = (-h / params.tau_epsp).exp();
        let p22 = p11_ex;
        let p30 = (-h / params.tau_reset).exp();

        // depend on the above
        let p21_ex = params.u_epsp * E * p11_ex * h / params.tau_epsp;
        let p20 = -params.tau_epsp / params.c_m * (-h / params.tau_epsp).exp_m1();

        tracing::debug!(
            target: "spiketide-neural",
            h, p11_ex, p21_ex, p22, p20, p30,
            "calibrated propagators"
        );

        Ok(Self {
            p11_ex,
            p21_ex,
            p22,
            p20,
            p30,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_time_constants() {
        let grid = TimeGrid::new(0.1).unwrap();
        let params = ChsParameters {
            tau_reset: 0.0,
            ..Default::default()
        };
        assert!(Propagators::calibrate(&params, &grid).is_err());
    }

    #[test]
    fn test_decay_factors_match_time_constants() {
        let grid = TimeGrid::new(0.5).unwrap();
        let params = ChsParameters::default();
        let p = Propagators::calibrate(&params, &grid).unwrap();
        assert!((p.p22 - (-0.5f64 / 8.5).exp()).abs() < 1e-15);
        assert!((p.p30 - (-0.5f64 / 15.4).exp()).abs() < 1e-15);
        assert_eq!(p.p11_ex, p.p22);
    }

    #[test]
    fn test_alpha_epsp_peaks_at_u_epsp_after_tau() {
        // A unit spike integrated exactly peaks at U_epsp after tau_epsp.
        let params = ChsParameters::default();
        let h = 0.05;
        let grid = TimeGrid::new(h).unwrap();
        let p = Propagators::calibrate(&params, &grid).unwrap();

        let (mut i_syn, mut v_syn) = (1.0, 0.0);
        let steps = (params.tau_epsp / h).round() as usize;
        for _ in 0..steps {
            v_syn = v_syn * p.p22 + i_syn * p.p21_ex;
            i_syn *= p.p11_ex;
        }
        assert!((v_syn - params.u_epsp).abs() < 1e-9);
    }

    #[test]
    fn test_current_propagator_approaches_steady_state() {
        let params = ChsParameters::default();
        let grid = TimeGrid::new(0.1).unwrap();
        let p = Propagators::calibrate(&params, &grid).unwrap();
        let mut v = 0.0;
        for _ in 0..20_000 {
            v = v * p.p22 + 1.0 * p.p20;
        }
        // steady state of dV/dt = -V/tau + I/C is tau * I / C
        assert!((v - params.tau_epsp / params.c_m).abs() < 1e-9);
    }
}
