//! Handler capability and handler failure outcomes.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use crate::event::{Event, EventType};

/// Broad classification of a handler failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerErrorKind {
    /// The handler refused the event on business grounds.
    Rejected,
    /// The payload did not carry what the handler required.
    InvalidPayload,
    /// A dependency of the handler was unavailable.
    Unavailable,
    /// The invocation exceeded the dispatcher's handler timeout.
    TimedOut,
    /// The invocation panicked.
    Panicked,
    /// Any other failure.
    Internal,
}

impl fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rejected => "rejected",
            Self::InvalidPayload => "invalid_payload",
            Self::Unavailable => "unavailable",
            Self::TimedOut => "timed_out",
            Self::Panicked => "panicked",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Failure outcome of a single `handle` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// The handler refused the event.
    #[error("rejected: {reason}")]
    Rejected {
        /// Why the event was refused.
        reason: String,
    },

    /// The payload variant or contents were not usable.
    #[error("invalid payload for {event_type}: {message}")]
    InvalidPayload {
        /// Type of the offending event.
        event_type: EventType,
        /// What was wrong with the payload.
        message: String,
    },

    /// A dependency was unavailable.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// The invocation ran past the configured handler timeout.
    #[error("timed out after {timeout_ms}ms")]
    TimedOut {
        /// The timeout that was exceeded.
        timeout_ms: u64,
    },

    /// The invocation panicked.
    #[error("panicked: {0}")]
    Panicked(String),

    /// Any other failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Classification of this failure.
    #[must_use]
    pub const fn kind(&self) -> HandlerErrorKind {
        match self {
            Self::Rejected { .. } => HandlerErrorKind::Rejected,
            Self::InvalidPayload { .. } => HandlerErrorKind::InvalidPayload,
            Self::Unavailable(_) => HandlerErrorKind::Unavailable,
            Self::TimedOut { .. } => HandlerErrorKind::TimedOut,
            Self::Panicked(_) => HandlerErrorKind::Panicked,
            Self::Internal(_) => HandlerErrorKind::Internal,
        }
    }

    /// Shorthand for [`HandlerError::Rejected`].
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }
}

/// Result of a single `handle` call.
pub type HandlerResult = Result<(), HandlerError>;

/// A subscriber that reacts to events.
///
/// The dispatcher may call `handle` on the same instance concurrently for
/// different events, so implementations that keep mutable state must guard
/// it themselves.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// React to one event.
    ///
    /// A returned error is logged and counted by the dispatcher. It never
    /// affects sibling handlers of the same event or later events.
    async fn handle(&self, event: &Event) -> HandlerResult;

    /// Stable, non-empty name used in diagnostics.
    fn name(&self) -> &str;
}
