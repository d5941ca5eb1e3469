// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Simulation time grid
//!
//! All model time is expressed in integer steps of a fixed resolution. The
//! millisecond view exists for time constants and STDP timing arithmetic.

use super::error::{NeuralError, Result};

/// Fixed global step size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    resolution_ms: f64,
}

impl TimeGrid {
    /// Create a grid with the given resolution (ms). Must be finite and > 0.
    pub fn new(resolution_ms: f64) -> Result<Self> {
        if !resolution_ms.is_finite() || resolution_ms <= 0.0 {
            return Err(NeuralError::InvalidTime {
                field: "resolution",
                reason: format!("must be a positive finite number of ms, got {}", resolution_ms),
            });
        }
        Ok(Self { resolution_ms })
    }

    #[inline]
    pub fn resolution_ms(&self) -> f64 {
        self.resolution_ms
    }

    #[inline]
    pub fn steps_to_ms(&self, steps: u64) -> f64 {
        steps as f64 * self.resolution_ms
    }

    /// Nearest grid step for a time in ms. Negative times map to step 0.
    #[inline]
    pub fn ms_to_steps(&self, ms: f64) -> u64 {
        (ms / self.resolution_ms).round().max(0.0) as u64
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self { resolution_ms: 0.1 }
    }
}
