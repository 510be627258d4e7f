//! Courier Handlers - Domain event handlers for the Courier event router.
//!
//! Each handler reacts to a slice of the event catalogue, keeps its own
//! counters behind its own synchronization, and ignores payloads it does not
//! understand. [`Services`] wires all of them onto a dispatcher.
//!
//! # Example
//!
//! ```rust,no_run
//! use courier_events::{DispatcherConfig, EventDispatcher};
//! use courier_handlers::{Latency, Services};
//!
//! # async fn example() -> courier_events::DispatchResult<()> {
//! let services = Services::new(Latency::Disabled);
//! let mut dispatcher = EventDispatcher::with_registry(DispatcherConfig::default(), services.registry());
//! dispatcher.start().await?;
//! // ... submit events ...
//! dispatcher.stop().await?;
//! println!("users: {}", services.users.user_count());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod analytics;
mod inventory;
mod latency;
mod notification;
mod order;
mod payment;
mod services;
mod user;

pub use analytics::AnalyticsService;
pub use inventory::InventoryManager;
pub use latency::Latency;
pub use notification::{Channel, Notification, NotificationService, notifications_for};
pub use order::{OrderCounts, OrderProcessor};
pub use payment::{PaymentCounts, PaymentGateway};
pub use services::Services;
pub use user::UserManager;
