// Copyright 2025 Spiketide Developers
// SPDX-License-Identifier: Apache-2.0

//! Post-synaptic spike archive
//!
//! A neuron with incoming STDP connections keeps the times of its own spikes
//! together with its depression trace `K-` at each of those times. Synapses
//! read this history through the narrow [`SpikeHistory`] capability and never
//! touch the neuron's state directly.
//!
//! Entries are pruned once every registered connection has read them, except
//! the most recent one, which may still be needed to evaluate `K-`.

use std::collections::vec_deque;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::types::{NeuralError, Result};

/// One archived post-synaptic spike
#[derive(Debug)]
pub struct HistoryEntry {
    /// Spike time (ms)
    pub t: f64,
    /// Depression trace immediately after this spike
    pub k_minus: f64,
    access_counter: AtomicUsize,
}

impl HistoryEntry {
    fn new(t: f64, k_minus: f64) -> Self {
        Self {
            t,
            k_minus,
            access_counter: AtomicUsize::new(0),
        }
    }

    /// Number of times a connection has consumed this entry
    pub fn access_count(&self) -> usize {
        self.access_counter.load(Ordering::Relaxed)
    }

    #[inline]
    fn mark_read(&self) {
        self.access_counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl Clone for HistoryEntry {
    fn clone(&self) -> Self {
        Self {
            t: self.t,
            k_minus: self.k_minus,
            access_counter: AtomicUsize::new(self.access_count()),
        }
    }
}

/// Ordered view over the entries of one history query
#[derive(Debug, Clone)]
pub struct HistoryWindow<'a> {
    inner: vec_deque::Iter<'a, HistoryEntry>,
}

impl<'a> HistoryWindow<'a> {
    pub fn empty() -> Self {
        Self {
            inner: Default::default(),
        }
    }
}

impl<'a> Iterator for HistoryWindow<'a> {
    type Item = &'a HistoryEntry;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for HistoryWindow<'_> {}

/// Read-only spike-history capability exposed by a post-synaptic neuron
pub trait SpikeHistory {
    /// Archived spikes with `t1 < t <= t2`, in ascending time order.
    fn history(&self, t1: f64, t2: f64) -> HistoryWindow<'_>;

    /// Depression trace `K-` evaluated at `t`, using only spikes strictly
    /// before `t`.
    fn decayed_trace_value_at(&self, t: f64) -> f64;
}

#[derive(Debug, Clone)]
pub struct SpikeArchive {
    tau_minus: f64,
    tau_minus_inv: f64,
    k_minus: f64,
    last_spike: f64,
    n_incoming: usize,
    history: VecDeque<HistoryEntry>,
}

impl SpikeArchive {
    pub const DEFAULT_TAU_MINUS: f64 = 20.0;

    pub fn new(tau_minus: f64) -> Result<Self> {
        Self::validate_tau_minus(tau_minus)?;
        Ok(Self {
            tau_minus,
            tau_minus_inv: 1.0 / tau_minus,
            k_minus: 0.0,
            last_spike: -1.0,
            n_incoming: 0,
            history: VecDeque::new(),
        })
    }

    fn validate_tau_minus(tau_minus: f64) -> Result<()> {
        if !tau_minus.is_finite() || tau_minus <= 0.0 {
            return Err(NeuralError::invalid(
                "tau_minus",
                format!("must be > 0, got {}", tau_minus),
            ));
        }
        Ok(())
    }

    /// Copy of this archive with a different depression time constant
    pub fn with_tau_minus(&self, tau_minus: f64) -> Result<Self> {
        Self::validate_tau_minus(tau_minus)?;
        let mut candidate = self.clone();
        candidate.tau_minus = tau_minus;
        candidate.tau_minus_inv = 1.0 / tau_minus;
        Ok(candidate)
    }

    /// Register one more incoming STDP connection.
    ///
    /// Entries at or before `t_first_read` will never be read by the new
    /// connection, so they are counted as read on its behalf. Otherwise the
    /// extra connection would keep them alive forever.
    pub fn register_stdp_connection(&mut self, t_first_read: f64) {
        for entry in self
            .history
            .iter()
            .take_while(|entry| entry.t <= t_first_read)
        {
            entry.mark_read();
        }
        self.n_incoming += 1;
        tracing::debug!(
            target: "spiketide-neural",
            n_incoming = self.n_incoming,
            t_first_read,
            "registered STDP connection"
        );
    }

    /// Record a spike emitted at `t_sp` (ms).
    pub fn record_spike(&mut self, t_sp: f64) {
        if self.n_incoming > 0 {
            while self.history.len() > 1 {
                match self.history.front() {
                    Some(front) if front.access_count() >= self.n_incoming => {
                        self.history.pop_front();
                    }
                    _ => break,
                }
            }
            self.k_minus =
                self.k_minus * ((self.last_spike - t_sp) * self.tau_minus_inv).exp() + 1.0;
            self.last_spike = t_sp;
            self.history.push_back(HistoryEntry::new(t_sp, self.k_minus));
        } else {
            self.last_spike = t_sp;
        }
    }

    /// Forget all spikes and the trace, keeping registrations
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.k_minus = 0.0;
        self.last_spike = -1.0;
    }

    #[inline]
    pub fn tau_minus(&self) -> f64 {
        self.tau_minus
    }

    #[inline]
    pub fn last_spike(&self) -> f64 {
        self.last_spike
    }

    #[inline]
    pub fn n_incoming(&self) -> usize {
        self.n_incoming
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

impl Default for SpikeArchive {
    fn default() -> Self {
        Self {
            tau_minus: Self::DEFAULT_TAU_MINUS,
            tau_minus_inv: 1.0 / Self::DEFAULT_TAU_MINUS,
            k_minus: 0.0,
            last_spike: -1.0,
            n_incoming: 0,
            history: VecDeque::new(),
        }
    }
}

impl SpikeHistory for SpikeArchive {
    fn history(&self, t1: f64, t2: f64) -> HistoryWindow<'_> {
        if self.history.is_empty() {
            return HistoryWindow::empty();
        }
        let start = self.history.partition_point(|entry| entry.t <= t1);
        let finish = start
            + self
                .history
                .range(start..)
                .take_while(|entry| entry.t <= t2)
                .count();
        let window = self.history.range(start..finish);
        for entry in window.clone() {
            entry.mark_read();
        }
        HistoryWindow { inner: window }
    }

    fn decayed_trace_value_at(&self, t: f64) -> f64 {
        if self.history.is_empty() {
            return self.k_minus;
        }
        self.history
            .iter()
            .rev()
            .find(|entry| t > entry.t)
            .map(|entry| entry.k_minus * ((entry.t - t) * self.tau_minus_inv).exp())
            .unwrap_or(0.0)
    }
}
