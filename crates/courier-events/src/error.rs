//! Dispatcher error types.

use thiserror::Error;

use crate::dispatcher::DispatcherState;

/// Errors returned by dispatcher operations.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The operation is not allowed in the dispatcher's current state.
    #[error("cannot {operation} while dispatcher is {state}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// State the dispatcher was in.
        state: DispatcherState,
    },

    /// The ingestion queue is closed; the dispatcher is stopping or stopped.
    #[error("dispatcher queue is closed")]
    Closed,

    /// The dispatch loop task ended abnormally.
    #[error("dispatch loop failed: {0}")]
    LoopFailed(String),
}

/// Result type for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
