// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Externally prepared noise signal
//!
//! The neuron does not draw deviates while it runs. The noise signal is
//! prepared up front, at least as long as the simulation, and read one value
//! per step. Sequence and cursor live together so replacing the sequence
//! always rewinds the cursor.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::types::{NeuralError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseSource {
    sequence: Vec<f64>,
    cursor: usize,
}

impl NoiseSource {
    /// Wrap a prepared signal. Every value must be finite.
    pub fn new(sequence: Vec<f64>) -> Result<Self> {
        if let Some(idx) = sequence.iter().position(|v| !v.is_finite()) {
            return Err(NeuralError::invalid(
                "noise",
                format!("value at index {} is not finite", idx),
            ));
        }
        Ok(Self {
            sequence,
            cursor: 0,
        })
    }

    /// Draw `len` standard-normal deviates from a caller-supplied generator.
    pub fn gaussian<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let sequence = (0..len)
            .map(|_| -> f64 { StandardNormal.sample(&mut *rng) })
            .collect();
        Self {
            sequence,
            cursor: 0,
        }
    }

    /// An empty signal disables noise altogether.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        !self.sequence.is_empty()
    }

    /// Value the next step will consume, or `None` when noise is disabled.
    ///
    /// Fails with `NoiseExhausted` once an enabled signal has been used up.
    /// Does not advance the cursor.
    pub fn peek(&self, step: u64) -> Result<Option<f64>> {
        if !self.is_enabled() {
            return Ok(None);
        }
        match self.sequence.get(self.cursor) {
            Some(value) => Ok(Some(*value)),
            None => Err(NeuralError::NoiseExhausted {
                step,
                available: self.sequence.len(),
            }),
        }
    }

    /// Move past the value returned by the last successful `peek`.
    #[inline]
    pub(crate) fn advance(&mut self) {
        if self.cursor < self.sequence.len() {
            self.cursor += 1;
        }
    }

    /// Start reading the sequence from the beginning again.
    #[inline]
    pub(crate) fn rewind(&mut self) {
        self.cursor = 0;
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.sequence.len() - self.cursor
    }

    pub fn sequence(&self) -> &[f64] {
        &self.sequence
    }
}
