//! Low-stock handler.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, error, info, warn};

use courier_events::{Event, EventHandler, EventPayload, HandlerResult, Urgency};

use crate::latency::Latency;

/// Counts low-stock alerts and flags automatic reorders for critical ones.
#[derive(Debug)]
pub struct InventoryManager {
    name: String,
    latency: Latency,
    alerts: AtomicU64,
    reorders: AtomicU64,
}

impl InventoryManager {
    /// Create an inventory manager with simulated latency.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Latency::default(),
            alerts: AtomicU64::new(0),
            reorders: AtomicU64::new(0),
        }
    }

    /// Set the latency behavior.
    #[must_use]
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Low-stock alerts seen this session.
    #[must_use]
    pub fn alert_count(&self) -> u64 {
        self.alerts.load(Ordering::Relaxed)
    }

    /// Supplier reorders triggered by critical alerts.
    #[must_use]
    pub fn reorder_count(&self) -> u64 {
        self.reorders.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventHandler for InventoryManager {
    async fn handle(&self, event: &Event) -> HandlerResult {
        let EventPayload::Inventory(stock) = &event.payload else {
            debug!(handler = %self.name, event_id = %event.id, "ignoring non-inventory payload");
            return Ok(());
        };

        let alerts = self.alerts.fetch_add(1, Ordering::Relaxed).saturating_add(1);

        match stock.urgency {
            Urgency::Low | Urgency::Medium => info!(
                handler = %self.name,
                product = %stock.product_name,
                remaining = stock.current_quantity,
                minimum = stock.min_required_quantity,
                warehouse = %stock.warehouse,
                urgency = ?stock.urgency,
                alerts,
                "low stock"
            ),
            Urgency::High => warn!(
                handler = %self.name,
                product = %stock.product_name,
                remaining = stock.current_quantity,
                minimum = stock.min_required_quantity,
                warehouse = %stock.warehouse,
                alerts,
                "low stock, high urgency"
            ),
            Urgency::Critical => {
                self.reorders.fetch_add(1, Ordering::Relaxed);
                error!(
                    handler = %self.name,
                    product = %stock.product_name,
                    remaining = stock.current_quantity,
                    minimum = stock.min_required_quantity,
                    warehouse = %stock.warehouse,
                    alerts,
                    "critical stock, placing supplier order"
                );
            },
        }

        self.latency.pause(30, 100).await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
