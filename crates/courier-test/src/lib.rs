//! Courier Test - Shared test utilities for the Courier event router.
//!
//! This crate provides mock handlers and event fixtures that can be used
//! across Courier crates as a dev-dependency.
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! courier-test.workspace = true
//! ```
//!
//! ```rust,ignore
//! use courier_test::{RecordingHandler, test_event};
//! use courier_events::{EventDispatcher, EventType};
//!
//! #[tokio::test]
//! async fn test_delivery() {
//!     let handler = RecordingHandler::new("h1");
//!     let mut dispatcher = EventDispatcher::default();
//!     dispatcher.register(EventType::OrderPlaced, handler.clone().into_dyn()).unwrap();
//!     dispatcher.start().await.unwrap();
//!     dispatcher.submit(test_event("e1", EventType::OrderPlaced)).await.unwrap();
//!     dispatcher.stop().await.unwrap();
//!     assert_eq!(handler.event_ids(), vec!["e1"]);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; output is captured by the test harness.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
