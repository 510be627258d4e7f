//! Dispatcher tuning knobs.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default capacity of the ingestion queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// Largest ingestion queue capacity. Larger values are lowered to it.
pub const MAX_QUEUE_CAPACITY: usize = 1_000_000;

/// How `submit` hands an event to the ingestion queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    /// Push on the caller's task, waiting for capacity when the queue is
    /// full. Events from one caller enter the queue in call order.
    #[default]
    Blocking,
    /// Push on a separately spawned hand-off task. The caller never waits
    /// on a full queue, but queue order follows the scheduling order of the
    /// hand-off tasks, not the order of `submit` calls.
    Detached,
}

/// Dispatcher configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Capacity of the ingestion queue. Clamped to
    /// `1..=`[`MAX_QUEUE_CAPACITY`] when the dispatcher is built.
    pub queue_capacity: usize,
    /// Submission hand-off mode.
    pub submit_mode: SubmitMode,
    /// Upper bound on a single handler invocation.
    ///
    /// `None` (the default) waits forever: a handler that never returns
    /// stalls the dispatch loop.
    pub handler_timeout: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            submit_mode: SubmitMode::default(),
            handler_timeout: None,
        }
    }
}

impl DispatcherConfig {
    /// Set the queue capacity.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the submit mode.
    #[must_use]
    pub fn with_submit_mode(mut self, mode: SubmitMode) -> Self {
        self.submit_mode = mode;
        self
    }

    /// Bound every handler invocation by `timeout`.
    #[must_use]
    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = Some(timeout);
        self
    }
}
