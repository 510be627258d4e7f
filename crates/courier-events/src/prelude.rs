//! Prelude module - commonly used types for convenient import.
//!
//! Use `use courier_events::prelude::*;` to import all essential types.

// Dispatcher
pub use crate::{DispatcherConfig, DispatcherState, EventDispatcher, EventSubmitter, SubmitMode};

// Errors
pub use crate::{DispatchError, DispatchResult};

// Events
pub use crate::{Event, EventPayload, EventType};

// Handler capability
pub use crate::{EventHandler, HandlerError, HandlerErrorKind, HandlerResult, HandlerRegistry};

// Stats
pub use crate::StatsSnapshot;
