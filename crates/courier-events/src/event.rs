//! Event envelope and event type discriminant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payload::EventPayload;

/// Routing key for events.
///
/// The set is closed and known at configuration time. The dispatcher never
/// interprets the meaning of a type; it only uses it to look up handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// A user account was created.
    UserCreated,
    /// A user account was updated.
    UserUpdated,
    /// A user account was deleted.
    UserDeleted,
    /// An order was placed.
    OrderPlaced,
    /// An order was cancelled.
    OrderCancelled,
    /// An order left the warehouse.
    OrderShipped,
    /// A payment went through.
    PaymentSuccess,
    /// A payment was declined.
    PaymentFailed,
    /// A payment was refunded.
    PaymentRefunded,
    /// An operational alert was raised.
    SystemAlert,
    /// Stock for a product fell below its minimum.
    InventoryLow,
    /// A product review was posted.
    ReviewAdded,
    /// A promo code was applied to an order.
    PromoCodeUsed,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::UserCreated,
        Self::UserUpdated,
        Self::UserDeleted,
        Self::OrderPlaced,
        Self::OrderCancelled,
        Self::OrderShipped,
        Self::PaymentSuccess,
        Self::PaymentFailed,
        Self::PaymentRefunded,
        Self::SystemAlert,
        Self::InventoryLow,
        Self::ReviewAdded,
        Self::PromoCodeUsed,
    ];

    /// Stable wire name of this type (e.g. `ORDER_PLACED`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserCreated => "USER_CREATED",
            Self::UserUpdated => "USER_UPDATED",
            Self::UserDeleted => "USER_DELETED",
            Self::OrderPlaced => "ORDER_PLACED",
            Self::OrderCancelled => "ORDER_CANCELLED",
            Self::OrderShipped => "ORDER_SHIPPED",
            Self::PaymentSuccess => "PAYMENT_SUCCESS",
            Self::PaymentFailed => "PAYMENT_FAILED",
            Self::PaymentRefunded => "PAYMENT_REFUNDED",
            Self::SystemAlert => "SYSTEM_ALERT",
            Self::InventoryLow => "INVENTORY_LOW",
            Self::ReviewAdded => "REVIEW_ADDED",
            Self::PromoCodeUsed => "PROMO_CODE_USED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string that names no known event type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown event type: {0}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownEventType(s.to_string()))
    }
}

/// An immutable unit of notification.
///
/// The dispatcher shares a submitted event with every matching handler
/// behind an `Arc`; handlers that need to keep data past their `handle`
/// call must clone it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Caller-assigned identifier, expected to be globally unique.
    pub id: String,
    /// Routing key.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Origin identifier (e.g. `order-service`).
    pub source: String,
    /// Domain data, opaque to the dispatcher.
    pub payload: EventPayload,
}

impl Event {
    /// Create an event stamped with the current time.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        event_type: EventType,
        source: impl Into<String>,
        payload: EventPayload,
    ) -> Self {
        Self {
            id: id.into(),
            event_type,
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }

    /// Override the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_type_round_trips_through_wire_name() {
        for event_type in EventType::ALL {
            assert_eq!(event_type.as_str().parse::<EventType>(), Ok(event_type));
        }
    }

    #[test]
    fn test_event_type_parse_is_case_insensitive() {
        assert_eq!("order_placed".parse(), Ok(EventType::OrderPlaced));
    }

    #[test]
    fn test_unknown_event_type() {
        let err = "ORDER_LOST".parse::<EventType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown event type: ORDER_LOST");
    }

    #[test]
    fn test_event_serializes_type_tag() {
        let event = Event::new("e1", EventType::InventoryLow, "inventory", EventPayload::Empty);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["id"], "e1");
        assert_eq!(json["type"], "INVENTORY_LOW");
        assert_eq!(json["source"], "inventory");
    }

    #[test]
    fn test_with_timestamp() {
        let at = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = Event::new("e1", EventType::UserCreated, "auth", EventPayload::Empty)
            .with_timestamp(at);
        assert_eq!(event.timestamp, at);
    }
}
