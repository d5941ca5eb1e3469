// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Power-law STDP connection
//!
//! ## Send path
//!
//! On each pre-synaptic spike at `t_spike`, with previous pre-synaptic spike
//! `t_last` and dendritic delay `d`:
//!
//! ```text
//! for every post spike t_post in (t_last - d, t_spike - d]:
//!     w <- facilitate(w, K+ * exp((t_last - (t_post + d)) / tau_plus))
//! w  <- depress(w, K-(t_spike - d))
//! K+ <- K+ * exp((t_last - t_spike) / tau_plus) + 1
//! ```
//!
//! Post spikes exactly coincident with `t_last` after the delay shift are
//! skipped.

use serde::Deserialize;
use spiketide_npu_neural::{
    EventKind, NeuralError, NeuronId, Node, Port, SpikeEvent, SpikeHistory, SpikeSource,
    SpikeTarget, TimeGrid,
};

use crate::common::StdpPlCommonProperties;
use crate::error::{PlasticityError, Result};
use crate::rule::{decay_trace, depress, facilitate};

/// Model name reported in receptor / event errors
pub const CONNECTION_NAME: &str = "stdp_pl_synapse_hom";

/// One plastic synapse.
///
/// Owned by the host's connection list; the target is referred to by id and
/// its history is passed in on every `send`.
#[derive(Debug, Clone, PartialEq)]
pub struct StdpPlConnection {
    weight: f64,
    kplus: f64,
    delay_steps: u64,
    receptor: Port,
    target: Option<NeuronId>,
    last_presynaptic_spike: f64,
}

impl Default for StdpPlConnection {
    fn default() -> Self {
        Self {
            weight: 1.0,
            kplus: 0.0,
            delay_steps: 1,
            receptor: 0,
            target: None,
            last_presynaptic_spike: 0.0,
        }
    }
}

/// Per-connection status dictionary
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionStatus {
    pub weight: f64,
    /// Delay in ms
    pub delay: f64,
    pub kplus: f64,
    pub receptor: Port,
    pub target: Option<NeuronId>,
}

impl ConnectionStatus {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "weight": self.weight,
            "delay": self.delay,
            "Kplus": self.kplus,
            "receptor": self.receptor,
            "target": self.target.map(|id| id.0),
        })
    }
}

/// Partial update of a connection; absent keys are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionStatusUpdate {
    pub weight: Option<f64>,
    /// Delay in ms, rounded to the grid
    pub delay: Option<f64>,
    #[serde(rename = "Kplus")]
    pub kplus: Option<f64>,
}

impl StdpPlConnection {
    pub fn new(weight: f64, delay_steps: u64) -> Result<Self> {
        let connection = Self {
            weight,
            delay_steps,
            ..Default::default()
        };
        connection.validate()?;
        Ok(connection)
    }

    fn validate(&self) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(PlasticityError::invalid(
                "weight",
                format!("must be >= 0, got {}", self.weight),
            ));
        }
        if self.delay_steps < 1 {
            return Err(PlasticityError::invalid(
                "delay",
                "must be at least one simulation step",
            ));
        }
        if !self.kplus.is_finite() || self.kplus < 0.0 {
            return Err(PlasticityError::invalid(
                "Kplus",
                format!("must be >= 0, got {}", self.kplus),
            ));
        }
        Ok(())
    }

    /// Validate the connection `sender -> receiver` on `receptor` and register
    /// it with the receiver's spike archive.
    ///
    /// `t_lastspike` is the sender's most recent spike time (ms). Nothing is
    /// modified when the receiver rejects the connection.
    pub fn check_connection<S, T>(
        &mut self,
        sender: &S,
        receiver: &mut T,
        receptor: Port,
        t_lastspike: f64,
        grid: &TimeGrid,
    ) -> Result<()>
    where
        S: SpikeSource + ?Sized,
        T: SpikeTarget + ?Sized,
    {
        let kind = sender.sends();
        if kind != EventKind::Spike {
            return Err(NeuralError::UnsupportedEvent {
                event: kind,
                model: CONNECTION_NAME,
            }
            .into());
        }
        let port = receiver.connect_sender(EventKind::Spike, receptor)?;

        receiver.register_stdp_connection(t_lastspike - grid.steps_to_ms(self.delay_steps));
        self.receptor = port;
        self.target = Some(receiver.node_id());
        self.last_presynaptic_spike = t_lastspike;

        tracing::debug!(
            target: "spiketide-plasticity",
            sender = %sender.node_id(),
            receiver = %receiver.node_id(),
            receptor = port,
            "STDP connection established"
        );
        Ok(())
    }

    /// Update weight and pre-synaptic trace for the spike `event` and return
    /// the event as delivered to the target.
    ///
    /// `t_lastspike` is the previous pre-synaptic spike time (ms). `target`
    /// must be the node this connection was checked against.
    pub fn send<T>(
        &mut self,
        event: &SpikeEvent,
        t_lastspike: f64,
        target: &T,
        cp: &StdpPlCommonProperties,
        grid: &TimeGrid,
    ) -> Result<SpikeEvent>
    where
        T: SpikeHistory + Node + ?Sized,
    {
        let receiver = self.target.ok_or(PlasticityError::NotConnected)?;
        if target.node_id() != receiver {
            return Err(PlasticityError::TargetMismatch {
                expected: receiver,
                got: target.node_id(),
            });
        }

        let t_spike = event.stamp_ms(grid);
        let dendritic_delay = grid.steps_to_ms(self.delay_steps);

        let mut weight = self.weight;
        for entry in target.history(t_lastspike - dendritic_delay, t_spike - dendritic_delay) {
            let minus_dt = t_lastspike - (entry.t + dendritic_delay);
            if minus_dt == 0.0 {
                continue;
            }
            weight = facilitate(weight, decay_trace(self.kplus, minus_dt, cp.tau_plus), cp);
        }
        weight = depress(
            weight,
            target.decayed_trace_value_at(t_spike - dendritic_delay),
            cp,
        );

        self.weight = weight;
        self.kplus = decay_trace(self.kplus, t_lastspike - t_spike, cp.tau_plus) + 1.0;
        self.last_presynaptic_spike = t_spike;

        tracing::trace!(
            target: "spiketide-plasticity",
            t_spike,
            weight,
            kplus = self.kplus,
            "spike transmitted"
        );

        Ok(SpikeEvent {
            weight,
            delay_steps: self.delay_steps,
            receptor: self.receptor,
            receiver: Some(receiver),
            ..event.clone()
        })
    }

    /// [`send`](Self::send) using the pre-synaptic spike time remembered from
    /// the previous transmission (or from connection setup).
    pub fn transmit<T>(
        &mut self,
        event: &SpikeEvent,
        target: &T,
        cp: &StdpPlCommonProperties,
        grid: &TimeGrid,
    ) -> Result<SpikeEvent>
    where
        T: SpikeHistory + Node + ?Sized,
    {
        self.send(event, self.last_presynaptic_spike, target, cp, grid)
    }

    pub fn status(&self, grid: &TimeGrid) -> ConnectionStatus {
        ConnectionStatus {
            weight: self.weight,
            delay: grid.steps_to_ms(self.delay_steps),
            kplus: self.kplus,
            receptor: self.receptor,
            target: self.target,
        }
    }

    /// Apply `update` if the result is valid; otherwise leave `self` untouched.
    pub fn set_status(&mut self, update: &ConnectionStatusUpdate, grid: &TimeGrid) -> Result<()> {
        let mut candidate = self.clone();
        if let Some(weight) = update.weight {
            candidate.weight = weight;
        }
        if let Some(delay) = update.delay {
            if !delay.is_finite() {
                return Err(PlasticityError::invalid(
                    "delay",
                    format!("must be finite, got {}", delay),
                ));
            }
            candidate.delay_steps = grid.ms_to_steps(delay);
        }
        if let Some(kplus) = update.kplus {
            candidate.kplus = kplus;
        }
        candidate.validate()?;
        *self = candidate;
        Ok(())
    }

    /// [`set_status`](Self::set_status) from a JSON status dictionary
    pub fn set_status_json(&mut self, value: serde_json::Value, grid: &TimeGrid) -> Result<()> {
        let update: ConnectionStatusUpdate = serde_json::from_value(value)
            .map_err(|e| PlasticityError::invalid("status", e.to_string()))?;
        self.set_status(&update, grid)
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn kplus(&self) -> f64 {
        self.kplus
    }

    #[inline]
    pub fn delay_steps(&self) -> u64 {
        self.delay_steps
    }

    #[inline]
    pub fn receptor(&self) -> Port {
        self.receptor
    }

    #[inline]
    pub fn target(&self) -> Option<NeuronId> {
        self.target
    }

    #[inline]
    pub fn last_presynaptic_spike(&self) -> f64 {
        self.last_presynaptic_spike
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spiketide_npu_neural::{HistoryWindow, SpikeArchive};

    /// Post-synaptic stand-in with a fixed depression trace and no spikes
    struct FixedTrace(f64);

    impl SpikeHistory for FixedTrace {
        fn history(&self, _t1: f64, _t2: f64) -> HistoryWindow<'_> {
            HistoryWindow::empty()
        }

        fn decayed_trace_value_at(&self, _t: f64) -> f64 {
            self.0
        }
    }

    impl Node for FixedTrace {
        fn node_id(&self) -> NeuronId {
            NeuronId(2)
        }

        fn model_name(&self) -> &'static str {
            "fixed_trace"
        }
    }

    struct Target {
        archive: SpikeArchive,
    }

    impl Node for Target {
        fn node_id(&self) -> NeuronId {
            NeuronId(2)
        }

        fn model_name(&self) -> &'static str {
            "target"
        }
    }

    impl SpikeHistory for Target {
        fn history(&self, t1: f64, t2: f64) -> HistoryWindow<'_> {
            self.archive.history(t1, t2)
        }

        fn decayed_trace_value_at(&self, t: f64) -> f64 {
            self.archive.decayed_trace_value_at(t)
        }
    }

    impl SpikeTarget for Target {
        fn connect_sender(&self, kind: EventKind, receptor: Port) -> spiketide_npu_neural::Result<Port> {
            if receptor == 0 {
                Ok(receptor)
            } else {
                Err(NeuralError::UnsupportedReceptor {
                    receptor,
                    event: kind,
                    model: "target",
                })
            }
        }

        fn register_stdp_connection(&mut self, t_first_read: f64) {
            self.archive.register_stdp_connection(t_first_read);
        }
    }

    struct Source;

    impl Node for Source {
        fn node_id(&self) -> NeuronId {
            NeuronId(1)
        }

        fn model_name(&self) -> &'static str {
            "source"
        }
    }

    impl SpikeSource for Source {}

    fn connected(grid: &TimeGrid) -> (StdpPlConnection, Target) {
        let mut target = Target {
            archive: SpikeArchive::default(),
        };
        let mut connection = StdpPlConnection::default();
        connection
            .check_connection(&Source, &mut target, 0, 0.0, grid)
            .unwrap();
        (connection, target)
    }

    #[test]
    fn test_defaults() {
        let c = StdpPlConnection::default();
        assert_eq!(c.weight(), 1.0);
        assert_eq!(c.kplus(), 0.0);
        assert_eq!(c.delay_steps(), 1);
        assert_eq!(c.target(), None);
    }

    #[test]
    fn test_send_before_check_fails() {
        let grid = TimeGrid::default();
        let mut c = StdpPlConnection::default();
        let err = c
            .send(
                &SpikeEvent::new(NeuronId(1), 10),
                0.0,
                &FixedTrace(0.0),
                &StdpPlCommonProperties::default(),
                &grid,
            )
            .unwrap_err();
        assert_eq!(err, PlasticityError::NotConnected);
    }

    #[test]
    fn test_send_rejects_foreign_history() {
        let grid = TimeGrid::default();
        let (mut c, _) = connected(&grid);
        let before = c.clone();

        // history of a neuron this connection was never checked against
        let mut foreign = Target {
            archive: SpikeArchive::default(),
        };
        foreign.archive.register_stdp_connection(0.0);
        foreign.archive.record_spike(0.5);
        struct Foreign<'a>(&'a Target);
        impl Node for Foreign<'_> {
            fn node_id(&self) -> NeuronId {
                NeuronId(7)
            }
            fn model_name(&self) -> &'static str {
                "foreign"
            }
        }
        impl SpikeHistory for Foreign<'_> {
            fn history(&self, t1: f64, t2: f64) -> HistoryWindow<'_> {
                self.0.history(t1, t2)
            }
            fn decayed_trace_value_at(&self, t: f64) -> f64 {
                self.0.decayed_trace_value_at(t)
            }
        }

        let err = c
            .send(
                &SpikeEvent::new(NeuronId(1), 10),
                0.0,
                &Foreign(&foreign),
                &StdpPlCommonProperties::default(),
                &grid,
            )
            .unwrap_err();
        assert_eq!(
            err,
            PlasticityError::TargetMismatch {
                expected: NeuronId(2),
                got: NeuronId(7)
            }
        );
        assert_eq!(c, before);
    }

    #[test]
    fn test_depression_only_send() {
        let grid = TimeGrid::default();
        let (mut c, _) = connected(&grid);
        let cp = StdpPlCommonProperties {
            lambda: 0.1,
            alpha: 1.0,
            ..Default::default()
        };
        let out = c
            .send(&SpikeEvent::new(NeuronId(1), 50), 0.0, &FixedTrace(2.0), &cp, &grid)
            .unwrap();
        assert!((c.weight() - 0.8).abs() < 1e-12);
        assert_eq!(out.weight, c.weight());
        assert_eq!(out.receiver, Some(NeuronId(2)));
        assert_eq!(out.delay_steps, 1);
        assert_eq!(out.stamp, 50);
    }

    #[test]
    fn test_trace_increments_and_decays() {
        let grid = TimeGrid::new(1.0).unwrap();
        let (mut c, _) = connected(&grid);
        let cp = StdpPlCommonProperties::default();
        let post = FixedTrace(0.0);

        c.send(&SpikeEvent::new(NeuronId(1), 10), 0.0, &post, &cp, &grid)
            .unwrap();
        assert_eq!(c.kplus(), 1.0);

        c.send(&SpikeEvent::new(NeuronId(1), 30), 10.0, &post, &cp, &grid)
            .unwrap();
        let expected = (-20.0f64 / 20.0).exp() + 1.0;
        assert!((c.kplus() - expected).abs() < 1e-12);
        assert_eq!(c.last_presynaptic_spike(), 30.0);
    }

    #[test]
    fn test_check_connection_rejects_receptor() {
        let grid = TimeGrid::default();
        let mut target = Target {
            archive: SpikeArchive::default(),
        };
        let mut c = StdpPlConnection::default();
        let err = c
            .check_connection(&Source, &mut target, 4, 0.0, &grid)
            .unwrap_err();
        assert!(matches!(
            err,
            PlasticityError::Neural(NeuralError::UnsupportedReceptor { receptor: 4, .. })
        ));
        assert_eq!(target.archive.n_incoming(), 0);
        assert_eq!(c, StdpPlConnection::default());
    }

    #[test]
    fn test_check_connection_registers() {
        let grid = TimeGrid::default();
        let (c, target) = connected(&grid);
        assert_eq!(target.archive.n_incoming(), 1);
        assert_eq!(c.target(), Some(NeuronId(2)));
    }

    #[test]
    fn test_set_status_validates_then_commits() {
        let grid = TimeGrid::new(0.5).unwrap();
        let mut c = StdpPlConnection::default();

        let err = c
            .set_status(
                &ConnectionStatusUpdate {
                    weight: Some(3.0),
                    kplus: Some(-1.0),
                    ..Default::default()
                },
                &grid,
            )
            .unwrap_err();
        assert!(matches!(err, PlasticityError::InvalidParameter { field: "Kplus", .. }));
        assert_eq!(c.weight(), 1.0);

        c.set_status_json(serde_json::json!({"weight": 2.5, "delay": 2.0, "Kplus": 0.5}), &grid)
            .unwrap();
        assert_eq!(c.weight(), 2.5);
        assert_eq!(c.delay_steps(), 4);
        let status = c.status(&grid).to_json();
        assert_eq!(status["delay"], 2.0);
        assert_eq!(status["Kplus"], 0.5);
    }

    #[test]
    fn test_delay_below_one_step_rejected() {
        let grid = TimeGrid::new(1.0).unwrap();
        let mut c = StdpPlConnection::default();
        let err = c
            .set_status(
                &ConnectionStatusUpdate {
                    delay: Some(0.2),
                    ..Default::default()
                },
                &grid,
            )
            .unwrap_err();
        assert!(matches!(err, PlasticityError::InvalidParameter { field: "delay", .. }));
        assert!(StdpPlConnection::new(-0.1, 1).is_err());
    }
}
