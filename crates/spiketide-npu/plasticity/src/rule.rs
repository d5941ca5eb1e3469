// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Pure power-law STDP update rule
//!
//! ```text
//! facilitation:  w <- w + lambda * w^mu * K+
//! depression:    w <- max(0, w - lambda * alpha * w * K-)
//! trace decay:   K(t + dt) = K(t) * exp(-dt / tau)
//! ```

use crate::common::StdpPlCommonProperties;

/// Potentiate `w` by one pairing with pre-synaptic trace value `kplus`.
///
/// `mu = 0` makes the increment independent of `w`.
#[inline]
pub fn facilitate(w: f64, kplus: f64, cp: &StdpPlCommonProperties) -> f64 {
    w + cp.lambda * w.powf(cp.mu) * kplus
}

/// Depress `w` by the post-synaptic trace value `kminus`, clamped at zero.
#[inline]
pub fn depress(w: f64, kminus: f64, cp: &StdpPlCommonProperties) -> f64 {
    let new_w = w - cp.lambda * cp.alpha * w * kminus;
    if new_w > 0.0 {
        new_w
    } else {
        0.0
    }
}

/// Evaluate a trace `minus_dt` ms away from where it was last known.
///
/// `minus_dt` is negative when projecting forward in time.
#[inline]
pub fn decay_trace(trace: f64, minus_dt: f64, tau: f64) -> f64 {
    trace * (minus_dt / tau).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depression_exact_value() {
        let cp = StdpPlCommonProperties {
            lambda: 0.1,
            alpha: 1.0,
            ..Default::default()
        };
        let w = depress(1.0, 2.0, &cp);
        assert!((w - 0.8).abs() < 1e-15);
    }

    #[test]
    fn test_depression_clamps_at_zero() {
        let cp = StdpPlCommonProperties {
            lambda: 1.0,
            alpha: 5.0,
            ..Default::default()
        };
        assert_eq!(depress(0.7, 3.0, &cp), 0.0);
    }

    #[test]
    fn test_facilitation_power_law() {
        let cp = StdpPlCommonProperties {
            lambda: 0.1,
            mu: 0.5,
            ..Default::default()
        };
        let w = facilitate(4.0, 1.0, &cp);
        assert!((w - 4.2).abs() < 1e-15);
    }

    #[test]
    fn test_zero_exponent_gives_constant_increment() {
        let cp = StdpPlCommonProperties {
            lambda: 0.05,
            mu: 0.0,
            ..Default::default()
        };
        for w in [0.0, 0.3, 1.0, 250.0] {
            let dw = facilitate(w, 2.0, &cp) - w;
            assert!((dw - 0.1).abs() < 1e-12, "w = {}", w);
        }
    }

    #[test]
    fn test_trace_decay() {
        assert_eq!(decay_trace(2.0, 0.0, 20.0), 2.0);
        assert!((decay_trace(1.0, -20.0, 20.0) - (-1.0f64).exp()).abs() < 1e-15);
    }
}
