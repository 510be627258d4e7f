//! Order handler.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use courier_events::{Event, EventHandler, EventPayload, EventType, HandlerResult};

use crate::latency::Latency;

/// Logs order placement, cancellation and shipment.
#[derive(Debug)]
pub struct OrderProcessor {
    name: String,
    latency: Latency,
    placed: AtomicU64,
    cancelled: AtomicU64,
    shipped: AtomicU64,
}

/// Order counts seen by an [`OrderProcessor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderCounts {
    /// `ORDER_PLACED` events.
    pub placed: u64,
    /// `ORDER_CANCELLED` events.
    pub cancelled: u64,
    /// `ORDER_SHIPPED` events.
    pub shipped: u64,
}

impl OrderProcessor {
    /// Create an order processor with simulated latency.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Latency::default(),
            placed: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
            shipped: AtomicU64::new(0),
        }
    }

    /// Set the latency behavior.
    #[must_use]
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Counts so far.
    #[must_use]
    pub fn counts(&self) -> OrderCounts {
        OrderCounts {
            placed: self.placed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            shipped: self.shipped.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl EventHandler for OrderProcessor {
    async fn handle(&self, event: &Event) -> HandlerResult {
        let EventPayload::Order(order) = &event.payload else {
            debug!(handler = %self.name, event_id = %event.id, "ignoring non-order payload");
            return Ok(());
        };

        match event.event_type {
            EventType::OrderPlaced => {
                self.placed.fetch_add(1, Ordering::Relaxed);
                info!(
                    handler = %self.name,
                    order_id = %order.order_id,
                    total = format_args!("${:.2}", order.total_amount),
                    shipping_address = %order.shipping_address,
                    items = order.items.len(),
                    "order placed"
                );
            },
            EventType::OrderCancelled => {
                self.cancelled.fetch_add(1, Ordering::Relaxed);
                match order.reason.as_deref().filter(|r| !r.is_empty()) {
                    Some(reason) => {
                        info!(handler = %self.name, order_id = %order.order_id, reason, "order cancelled");
                    },
                    None => info!(handler = %self.name, order_id = %order.order_id, "order cancelled"),
                }
            },
            EventType::OrderShipped => {
                self.shipped.fetch_add(1, Ordering::Relaxed);
                info!(handler = %self.name, order_id = %order.order_id, "order shipped");
            },
            other => {
                debug!(handler = %self.name, event_type = %other, "ignoring event type");
            },
        }

        self.latency.pause(100, 200).await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
