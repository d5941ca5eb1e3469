// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Properties shared by every power-law STDP synapse of one type

use serde::Deserialize;

use crate::error::{PlasticityError, Result};

/// Shared learning parameters.
///
/// `tau_plus` is the pre-synaptic trace time constant (ms), `lambda` the
/// learning rate, `alpha` the depression/facilitation asymmetry and `mu` the
/// weight-dependence exponent of facilitation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StdpPlCommonProperties {
    pub tau_plus: f64,
    pub lambda: f64,
    pub alpha: f64,
    pub mu: f64,
}

impl Default for StdpPlCommonProperties {
    fn default() -> Self {
        Self {
            tau_plus: 20.0,
            lambda: 0.1,
            alpha: 1.0,
            mu: 0.4,
        }
    }
}

/// Partial update of [`StdpPlCommonProperties`]; absent keys are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StdpPlCommonStatusUpdate {
    pub tau_plus: Option<f64>,
    pub lambda: Option<f64>,
    pub alpha: Option<f64>,
    pub mu: Option<f64>,
}

impl StdpPlCommonProperties {
    pub fn validate(&self) -> Result<()> {
        if !self.tau_plus.is_finite() || self.tau_plus <= 0.0 {
            return Err(PlasticityError::invalid(
                "tau_plus",
                format!("must be > 0, got {}", self.tau_plus),
            ));
        }
        for (field, value) in [("lambda", self.lambda), ("alpha", self.alpha), ("mu", self.mu)] {
            if !value.is_finite() {
                return Err(PlasticityError::invalid(
                    field,
                    format!("must be finite, got {}", value),
                ));
            }
        }
        Ok(())
    }

    /// Current values as a status dictionary
    pub fn status(&self) -> serde_json::Value {
        serde_json::json!({
            "tau_plus": self.tau_plus,
            "lambda": self.lambda,
            "alpha": self.alpha,
            "mu": self.mu,
        })
    }

    /// Apply `update` if the resulting properties are valid; otherwise leave
    /// `self` untouched.
    pub fn set_status(&mut self, update: &StdpPlCommonStatusUpdate) -> Result<()> {
        let candidate = Self {
            tau_plus: update.tau_plus.unwrap_or(self.tau_plus),
            lambda: update.lambda.unwrap_or(self.lambda),
            alpha: update.alpha.unwrap_or(self.alpha),
            mu: update.mu.unwrap_or(self.mu),
        };
        candidate.validate()?;
        *self = candidate;
        tracing::debug!(target: "spiketide-plasticity", props = ?self, "common properties updated");
        Ok(())
    }

    /// [`set_status`](Self::set_status) from a JSON status dictionary
    pub fn set_status_json(&mut self, value: serde_json::Value) -> Result<()> {
        let update: StdpPlCommonStatusUpdate = serde_json::from_value(value)
            .map_err(|e| PlasticityError::invalid("status", e.to_string()))?;
        self.set_status(&update)
    }
}
