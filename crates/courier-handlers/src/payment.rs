//! Payment handler.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

use courier_events::{Event, EventHandler, EventPayload, HandlerResult, PaymentStatus};

use crate::latency::Latency;

/// Logs payment outcomes. Branches on the payload's status rather than the
/// event type.
#[derive(Debug)]
pub struct PaymentGateway {
    name: String,
    latency: Latency,
    succeeded: AtomicU64,
    failed: AtomicU64,
    refunded: AtomicU64,
}

/// Payment counts seen by a [`PaymentGateway`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentCounts {
    /// Successful payments.
    pub succeeded: u64,
    /// Declined payments.
    pub failed: u64,
    /// Refunds.
    pub refunded: u64,
}

impl PaymentGateway {
    /// Create a payment gateway with simulated latency.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Latency::default(),
            succeeded: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            refunded: AtomicU64::new(0),
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
    pub fn counts(&self) -> PaymentCounts {
        PaymentCounts {
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            refunded: self.refunded.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl EventHandler for PaymentGateway {
    async fn handle(&self, event: &Event) -> HandlerResult {
        let EventPayload::Payment(payment) = &event.payload else {
            debug!(handler = %self.name, event_id = %event.id, "ignoring non-payment payload");
            return Ok(());
        };

        match payment.status {
            PaymentStatus::Success => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
                info!(
                    handler = %self.name,
                    payment_id = %payment.payment_id,
                    amount = format_args!("${:.2}", payment.amount),
                    currency = %payment.currency,
                    method = %payment.method,
                    "payment succeeded"
                );
            },
            PaymentStatus::Failed => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    handler = %self.name,
                    payment_id = %payment.payment_id,
                    reason = payment.failed_reason.as_deref().unwrap_or("unknown"),
                    "payment failed"
                );
            },
            PaymentStatus::Refunded => {
                self.refunded.fetch_add(1, Ordering::Relaxed);
                info!(
                    handler = %self.name,
                    payment_id = %payment.payment_id,
                    refund = format_args!("${:.2}", payment.refund_amount.unwrap_or(payment.amount)),
                    "payment refunded"
                );
            },
        }

        self.latency.pause(50, 150).await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
