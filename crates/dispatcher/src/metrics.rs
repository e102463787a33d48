//! Dispatch metrics for observability
//!
//! Counters only ever increase and never influence a dispatch result.

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::Outcome;

/// Counters shared by every dispatch through one `Dispatcher`
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total dispatch calls
    dispatched: AtomicU64,
    /// Dispatches that ended `Handled`
    handled: AtomicU64,
    /// Dispatches that ended `Unhandled`
    unhandled: AtomicU64,
    /// Handler invocations across all dispatches
    handlers_invoked: AtomicU64,
    /// Nodes visited across all dispatches
    nodes_visited: AtomicU64,
    /// Walks stopped because the parent chain revisited a node
    cycles_detected: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    pub fn handled(&self) -> u64 {
        self.handled.load(Ordering::Relaxed)
    }

    pub fn unhandled(&self) -> u64 {
        self.unhandled.load(Ordering::Relaxed)
    }

    pub fn handlers_invoked(&self) -> u64 {
        self.handlers_invoked.load(Ordering::Relaxed)
    }

    pub fn nodes_visited(&self) -> u64 {
        self.nodes_visited.load(Ordering::Relaxed)
    }

    pub fn cycles_detected(&self) -> u64 {
        self.cycles_detected.load(Ordering::Relaxed)
    }

    pub(crate) fn inc_handler_invoked(&self) {
        self.handlers_invoked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_cycle_detected(&self) {
        self.cycles_detected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finished walk
    pub(crate) fn record(&self, outcome: Outcome, visited: usize) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
        self.nodes_visited
            .fetch_add(visited as u64, Ordering::Relaxed);
        match outcome {
            Outcome::Handled => self.handled.fetch_add(1, Ordering::Relaxed),
            Outcome::Unhandled => self.unhandled.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            dispatched: self.dispatched(),
            handled: self.handled(),
            unhandled: self.unhandled(),
            handlers_invoked: self.handlers_invoked(),
            nodes_visited: self.nodes_visited(),
            cycles_detected: self.cycles_detected(),
        }
    }
}

/// Snapshot of dispatch metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub dispatched: u64,
    pub handled: u64,
    pub unhandled: u64,
    pub handlers_invoked: u64,
    pub nodes_visited: u64,
    pub cycles_detected: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_splits_by_outcome() {
        let metrics = DispatchMetrics::new();
        metrics.record(Outcome::Handled, 2);
        metrics.record(Outcome::Unhandled, 3);
        metrics.record(Outcome::Unhandled, 1);

        let snap = metrics.snapshot();
        assert_eq!(snap.dispatched, 3);
        assert_eq!(snap.handled, 1);
        assert_eq!(snap.unhandled, 2);
        assert_eq!(snap.nodes_visited, 6);
    }
}
