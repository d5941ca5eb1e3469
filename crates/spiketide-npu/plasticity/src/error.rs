// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Error types for plastic connections

use spiketide_npu_neural::{NeuralError, NeuronId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlasticityError {
    /// Receptor / event-kind rejection and time-grid errors from the neural layer
    #[error(transparent)]
    Neural(#[from] NeuralError),

    #[error("invalid synapse parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("connection has no target; check_connection must succeed before send")]
    NotConnected,

    #[error("spike history of {got} passed to a connection targeting {expected}")]
    TargetMismatch { expected: NeuronId, got: NeuronId },
}

impl PlasticityError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PlasticityError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlasticityError>;
