// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for neuron integration and connection setup

use super::event::EventKind;
use super::ids::Port;

/// Errors raised by the neural layer.
///
/// `InvalidParameter` and `InvalidTime` only surface from calibration and
/// status commits. `NoiseExhausted` is the one failure a running update can
/// produce. Receptor errors are connection-setup failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NeuralError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("invalid time `{field}`: {reason}")]
    InvalidTime { field: &'static str, reason: String },

    #[error("noise signal exhausted at step {step}: only {available} values were supplied")]
    NoiseExhausted { step: u64, available: usize },

    #[error("{model} does not accept receptor type {receptor} for {event} events")]
    UnsupportedReceptor {
        receptor: Port,
        event: EventKind,
        model: &'static str,
    },

    #[error("{model} does not handle {event} events")]
    UnsupportedEvent { event: EventKind, model: &'static str },
}

impl NeuralError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        NeuralError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = core::result::Result<T, NeuralError>;
