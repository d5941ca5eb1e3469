// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Per-step input accumulation
//!
//! Incoming events are summed into the slot of the step at which they take
//! effect. The neuron drains one slot per update step, in increasing order.
//! Input may arrive at most [`MAX_HORIZON_STEPS`] steps ahead of the next
//! slot to be drained.

use std::collections::VecDeque;

use crate::types::{NeuralError, Result};

/// Furthest an event may be scheduled ahead of the buffer's current step
pub const MAX_HORIZON_STEPS: u64 = 1 << 20;

/// Slots indexed by absolute grid step, starting at `base`.
#[derive(Debug, Clone, Default)]
pub struct RingBuffer {
    base: u64,
    slots: VecDeque<f64>,
}

impl RingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the slot for `step`.
    ///
    /// Steps already drained cannot receive input, and neither can steps
    /// beyond the horizon.
    pub fn add_value(&mut self, step: u64, value: f64) -> Result<()> {
        if step < self.base {
            return Err(NeuralError::InvalidTime {
                field: "arrival_step",
                reason: format!(
                    "input for step {} arrived after the buffer advanced to step {}",
                    step, self.base
                ),
            });
        }
        let ahead = step - self.base;
        if ahead >= MAX_HORIZON_STEPS {
            return Err(NeuralError::InvalidTime {
                field: "arrival_step",
                reason: format!(
                    "input for step {} is {} steps ahead of step {} (limit {})",
                    step, ahead, self.base, MAX_HORIZON_STEPS
                ),
            });
        }
        let idx = ahead as usize;
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, 0.0);
        }
        self.slots[idx] += value;
        Ok(())
    }

    /// Sum buffered for `step` without consuming it
    pub fn peek(&self, step: u64) -> f64 {
        if step < self.base {
            return 0.0;
        }
        self.slots
            .get((step - self.base) as usize)
            .copied()
            .unwrap_or(0.0)
    }

    /// Consume the slot for `step`, discarding any earlier slots.
    pub fn take_value(&mut self, step: u64) -> f64 {
        if step < self.base {
            return 0.0;
        }
        let skip = (step - self.base) as usize;
        let drop = skip.min(self.slots.len());
        self.slots.drain(..drop);
        self.base = step + 1;
        if skip > drop {
            return 0.0;
        }
        self.slots.pop_front().unwrap_or(0.0)
    }

    /// Drop all buffered input and restart at `base`
    pub fn reset(&mut self, base: u64) {
        self.slots.clear();
        self.base = base;
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|v| *v == 0.0)
    }
}
