//! Customer notifications.

use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

use courier_events::{Event, EventHandler, EventType, HandlerResult};

use crate::latency::Latency;

/// Delivery channel for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    /// Text message.
    Sms,
    /// Email.
    Email,
    /// Mobile push.
    Push,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sms => write!(f, "sms"),
            Self::Email => write!(f, "email"),
            Self::Push => write!(f, "push"),
        }
    }
}

/// A message sent on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    /// Where it goes.
    pub channel: Channel,
    /// What it says.
    pub message: &'static str,
}

const fn note(channel: Channel, message: &'static str) -> Notification {
    Notification { channel, message }
}

const SHIPPED: &[Notification] = &[
    note(Channel::Sms, "Your order is on its way!"),
    note(Channel::Email, "Tracking number sent"),
];
const PAYMENT_SUCCESS: &[Notification] = &[note(Channel::Email, "Receipt sent to your inbox")];
const REVIEW_ADDED: &[Notification] = &[note(Channel::Push, "Thanks for your review!")];
const PROMO_CODE_USED: &[Notification] =
    &[note(Channel::Email, "Promo code applied successfully!")];

/// Messages sent for `event_type`. Empty for types without notifications.
#[must_use]
pub fn notifications_for(event_type: EventType) -> &'static [Notification] {
    match event_type {
        EventType::OrderShipped => SHIPPED,
        EventType::PaymentSuccess => PAYMENT_SUCCESS,
        EventType::ReviewAdded => REVIEW_ADDED,
        EventType::PromoCodeUsed => PROMO_CODE_USED,
        _ => &[],
    }
}

/// Sends customer notifications for shipments, payments, reviews and promo
/// codes.
#[derive(Debug)]
pub struct NotificationService {
    name: String,
    latency: Latency,
    sent: AtomicU64,
}

impl NotificationService {
    /// Create a notification service with simulated latency.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Latency::default(),
            sent: AtomicU64::new(0),
        }
    }

    /// Set the latency behavior.
    #[must_use]
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Notifications sent so far.
    #[must_use]
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventHandler for NotificationService {
    async fn handle(&self, event: &Event) -> HandlerResult {
        let outgoing = notifications_for(event.event_type);
        if outgoing.is_empty() {
            debug!(handler = %self.name, event_type = %event.event_type, "nothing to notify");
        }

        for n in outgoing {
            self.sent.fetch_add(1, Ordering::Relaxed);
            info!(
                handler = %self.name,
                event_id = %event.id,
                channel = %n.channel,
                message = n.message,
                "notification sent"
            );
        }

        self.latency.pause(20, 80).await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_test::test_event;

    #[test]
    fn test_notifications_for() {
        assert_eq!(notifications_for(EventType::OrderShipped).len(), 2);
        assert_eq!(
            notifications_for(EventType::ReviewAdded)[0].channel,
            Channel::Push
        );
        assert!(notifications_for(EventType::UserCreated).is_empty());
    }

    #[tokio::test]
    async fn test_sent_count() {
        let notifier = NotificationService::new("notify").with_latency(Latency::Disabled);

        notifier
            .handle(&test_event("e1", EventType::OrderShipped))
            .await
            .unwrap();
        notifier
            .handle(&test_event("e2", EventType::SystemAlert))
            .await
            .unwrap();

        assert_eq!(notifier.sent_count(), 2);
    }
}
