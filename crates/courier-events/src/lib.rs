//! Courier Events - In-process event dispatcher.
//!
//! This crate provides:
//! - The [`Event`] envelope and its [`EventPayload`] variants
//! - The [`EventHandler`] capability that subscribers implement
//! - A write-once [`HandlerRegistry`] mapping event types to handlers
//! - The [`EventDispatcher`]: bounded ingestion queue, sequential dispatch
//!   loop and concurrent per-event fan-out
//!
//! # Architecture
//!
//! Producers call [`EventDispatcher::submit`] (or [`EventSubmitter::submit`]
//! from another task). Events land in a bounded FIFO queue drained by a
//! single dispatch loop. For each event the loop invokes every handler
//! registered for the event's type concurrently, then waits for all of them
//! before pulling the next event.
//!
//! ```text
//!   submit(ev) ──► [ bounded queue ] ──► dispatch loop
//!                                           │  (one event at a time)
//!                                           ├──► handler A ─┐
//!                                           ├──► handler B ─┼─► barrier
//!                                           └──► handler C ─┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use courier_events::prelude::*;
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl EventHandler for Audit {
//!     async fn handle(&self, event: &Event) -> HandlerResult {
//!         tracing::info!(event_id = %event.id, "audited");
//!         Ok(())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "audit"
//!     }
//! }
//!
//! # async fn example() -> DispatchResult<()> {
//! let mut dispatcher = EventDispatcher::new(DispatcherConfig::default());
//! dispatcher.register(EventType::OrderPlaced, Arc::new(Audit))?;
//! dispatcher.start().await?;
//!
//! dispatcher
//!     .submit(Event::new("e1", EventType::OrderPlaced, "order-service", EventPayload::Empty))
//!     .await?;
//!
//! let stats = dispatcher.stop().await?;
//! assert_eq!(stats.processed, 1);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod config;
mod dispatcher;
mod error;
mod event;
mod handler;
mod payload;
mod queue;
mod registry;
mod stats;

pub use config::{DEFAULT_QUEUE_CAPACITY, DispatcherConfig, MAX_QUEUE_CAPACITY, SubmitMode};
pub use dispatcher::{DispatcherState, EventDispatcher, EventSubmitter};
pub use error::{DispatchError, DispatchResult};
pub use event::{Event, EventType, UnknownEventType};
pub use handler::{EventHandler, HandlerError, HandlerErrorKind, HandlerResult};
pub use payload::{
    AlertData, EventPayload, InventoryData, OrderData, OrderItem, PaymentData, PaymentStatus,
    PromoCodeData, ReviewData, Urgency, UserData,
};
pub use registry::HandlerRegistry;
pub use stats::StatsSnapshot;
