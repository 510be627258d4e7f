//! Dispatch counters.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrency-safe dispatch counters.
///
/// All counters only ever increase and are never reset. `processed` counts
/// handler invocations, not events: an event with three handlers adds three.
/// Use `completed` for the number of events whose fan-out has finished.
#[derive(Debug, Default)]
pub(crate) struct DispatchStats {
    dispatched: AtomicU64,
    processed: AtomicU64,
    failed: AtomicU64,
    unhandled: AtomicU64,
    completed: AtomicU64,
}

impl DispatchStats {
    /// Create zeroed counters.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_dispatched(&self) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_processed(&self) {
        self.processed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_unhandled(&self) {
        self.unhandled.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn record_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    /// Point-in-time copy of every counter.
    ///
    /// Each counter is read independently, so a snapshot taken while the
    /// dispatcher is running may mix values from slightly different moments.
    #[must_use]
    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dispatched: self.dispatched.load(Ordering::SeqCst),
            processed: self.processed.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            unhandled: self.unhandled.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
        }
    }
}

/// Copy of the dispatch counters at one moment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Accepted `submit` calls.
    pub dispatched: u64,
    /// Finished handler invocations (success or failure).
    pub processed: u64,
    /// Handler invocations that failed, panicked or timed out.
    pub failed: u64,
    /// Events that had no registered handler.
    pub unhandled: u64,
    /// Events whose fan-out barrier completed.
    pub completed: u64,
}

impl StatsSnapshot {
    /// Handler invocations that succeeded.
    #[must_use]
    pub fn succeeded(&self) -> u64 {
        self.processed.saturating_sub(self.failed)
    }
}
