//! Per-kind counters and busy flags, plus the snapshot handed to presenters.

use crate::SimulationKind;

use super::log::LogEntry;

/// Successful invocations per kind. Session lifetime only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvocationCounters([u64; 4]);

impl InvocationCounters {
    /// Count for `kind`.
    pub fn get(&self, kind: SimulationKind) -> u64 {
        self.0[kind.index()]
    }

    /// Add exactly one to `kind`.
    pub fn increment(&mut self, kind: SimulationKind) {
        let slot = &mut self.0[kind.index()];
        *slot = slot.saturating_add(1);
    }

    /// Sum over all kinds.
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// `(kind, count)` pairs in [`SimulationKind::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (SimulationKind, u64)> + '_ {
        SimulationKind::ALL.into_iter().map(|k| (k, self.get(k)))
    }
}

/// True while a kind's call is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags([bool; 4]);

impl LoadingFlags {
    /// Whether `kind` is in flight.
    pub fn get(&self, kind: SimulationKind) -> bool {
        self.0[kind.index()]
    }

    /// Set `kind`'s flag.
    pub fn set(&mut self, kind: SimulationKind, loading: bool) {
        self.0[kind.index()] = loading;
    }

    /// Whether any kind is in flight.
    pub fn any(&self) -> bool {
        self.0.iter().any(|&b| b)
    }
}

/// Point-in-time copy of everything a presenter draws.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSnapshot {
    /// Log entries in append order.
    pub entries: Vec<LogEntry>,
    /// Successful invocations per kind.
    pub counters: InvocationCounters,
    /// In-flight flags per kind.
    pub loading: LoadingFlags,
    /// Whether a run-all is in progress.
    pub running: bool,
    /// Message sent with every call.
    pub message: String,
}
