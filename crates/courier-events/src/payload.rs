//! Domain payloads carried by events.
//!
//! The dispatcher never looks inside a payload. Handlers match on the
//! variant they understand and ignore the rest.

use serde::{Deserialize, Serialize};

/// One of the known payload shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum EventPayload {
    /// User account data.
    User(UserData),
    /// Order data.
    Order(OrderData),
    /// Payment data.
    Payment(PaymentData),
    /// Stock level data.
    Inventory(InventoryData),
    /// Product review data.
    Review(ReviewData),
    /// Promo code usage data.
    PromoCode(PromoCodeData),
    /// Operational alert data.
    Alert(AlertData),
    /// No payload.
    Empty,
}

impl EventPayload {
    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::Order(_) => "order",
            Self::Payment(_) => "payment",
            Self::Inventory(_) => "inventory",
            Self::Review(_) => "review",
            Self::PromoCode(_) => "promo_code",
            Self::Alert(_) => "alert",
            Self::Empty => "empty",
        }
    }
}

/// User account data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserData {
    /// User ID.
    pub user_id: String,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Action that produced the event (`create`, `update`, `delete`).
    pub action: String,
}

/// Order data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderData {
    /// Order ID.
    pub order_id: String,
    /// Ordering user.
    pub user_id: String,
    /// Order total.
    pub total_amount: f64,
    /// Order status.
    pub status: String,
    /// Line items.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Delivery address.
    pub shipping_address: String,
    /// Cancellation reason, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A single order line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Product ID.
    pub product_id: String,
    /// Product name.
    pub name: String,
    /// Units ordered.
    pub quantity: u32,
    /// Unit price.
    pub price: f64,
}

/// Outcome of a payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Payment captured.
    Success,
    /// Payment declined.
    Failed,
    /// Payment returned to the customer.
    Refunded,
}

/// Payment data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentData {
    /// Payment ID.
    pub payment_id: String,
    /// Order being paid.
    pub order_id: String,
    /// Amount charged.
    pub amount: f64,
    /// ISO currency code.
    pub currency: String,
    /// Payment outcome.
    pub status: PaymentStatus,
    /// Payment method (e.g. `credit_card`).
    pub method: String,
    /// Decline reason, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_reason: Option<String>,
    /// Refunded amount, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
}

/// How urgently stock needs replenishing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    /// Informational.
    Low,
    /// Should be reordered soon.
    Medium,
    /// Should be reordered now.
    High,
    /// Stock-out imminent.
    Critical,
}

/// Stock level data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryData {
    /// Product ID.
    pub product_id: String,
    /// Product name.
    pub product_name: String,
    /// Units currently in stock.
    pub current_quantity: u32,
    /// Minimum units required.
    pub min_required_quantity: u32,
    /// Warehouse holding the stock.
    pub warehouse: String,
    /// Replenishment urgency.
    pub urgency: Urgency,
}

/// Product review data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewData {
    /// Review ID.
    pub review_id: String,
    /// Reviewed product.
    pub product_id: String,
    /// Reviewer.
    pub user_id: String,
    /// Star rating, 1-5.
    pub rating: u8,
    /// Review title.
    pub title: String,
    /// Free-form text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether the reviewer bought the product.
    pub verified_purchase: bool,
}

/// Promo code usage data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromoCodeData {
    /// The code itself.
    pub code: String,
    /// User applying the code.
    pub user_id: String,
    /// Order the code was applied to.
    pub order_id: String,
    /// Absolute discount.
    pub discount_amount: f64,
    /// Percentage discount, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    /// Minimum order amount for the code, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<f64>,
}

/// Operational alert data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertData {
    /// Severity label (e.g. `WARNING`).
    pub severity: String,
    /// Service raising the alert.
    pub service: String,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable code, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Suggested operator action.
    pub action: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_tagging() {
        let payload = EventPayload::Inventory(InventoryData {
            product_id: "prod_101".into(),
            product_name: "Book".into(),
            current_quantity: 3,
            min_required_quantity: 10,
            warehouse: "north".into(),
            urgency: Urgency::High,
        });

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["kind"], "inventory");
        assert_eq!(json["data"]["urgency"], "high");
        assert_eq!(payload.kind(), "inventory");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let payment = PaymentData {
            payment_id: "pay_1".into(),
            order_id: "order_1".into(),
            amount: 10.0,
            currency: "USD".into(),
            status: PaymentStatus::Success,
            method: "card".into(),
            failed_reason: None,
            refund_amount: None,
        };

        let json = serde_json::to_string(&payment).unwrap();
        assert!(json.contains("\"status\":\"SUCCESS\""));
        assert!(!json.contains("failed_reason"));
        assert!(!json.contains("refund_amount"));
    }

    #[test]
    fn test_empty_payload() {
        let json = serde_json::to_value(EventPayload::Empty).unwrap();
        assert_eq!(json["kind"], "empty");
    }
}
