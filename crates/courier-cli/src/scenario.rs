//! The demo storefront scenario: one customer's journey from sign-up to a
//! refund, plus a monitoring alert.

use chrono::{DateTime, Duration, Utc};

use courier_events::{
    AlertData, Event, EventPayload, EventType, InventoryData, OrderData, OrderItem, PaymentData,
    PaymentStatus, PromoCodeData, ReviewData, Urgency, UserData,
};

const USER_ID: &str = "user_1001";
const ORDER_ID: &str = "order_5001";
const SHIPPING_ADDRESS: &str = "10 Tverskaya St, Moscow";

fn order_items() -> Vec<OrderItem> {
    vec![
        OrderItem {
            product_id: "prod_101".to_owned(),
            name: "Book: Systems Programming in Practice".to_owned(),
            quantity: 1,
            price: 199.99,
        },
        OrderItem {
            product_id: "prod_102".to_owned(),
            name: "Logo T-shirt".to_owned(),
            quantity: 2,
            price: 25.00,
        },
    ]
}

fn order(status: &str) -> EventPayload {
    EventPayload::Order(OrderData {
        order_id: ORDER_ID.to_owned(),
        user_id: USER_ID.to_owned(),
        total_amount: 249.99,
        status: status.to_owned(),
        items: order_items(),
        shipping_address: SHIPPING_ADDRESS.to_owned(),
        reason: None,
    })
}

fn user(username: &str, email: &str, action: &str) -> EventPayload {
    EventPayload::User(UserData {
        user_id: USER_ID.to_owned(),
        username: username.to_owned(),
        email: email.to_owned(),
        action: action.to_owned(),
    })
}

/// Build the scenario. Event timestamps are offset from `start`.
#[must_use]
pub(crate) fn events(start: DateTime<Utc>) -> Vec<Event> {
    let at = |secs: i64| {
        start
            .checked_add_signed(Duration::seconds(secs))
            .unwrap_or(start)
    };

    vec![
        Event::new(
            "evt_user_001",
            EventType::UserCreated,
            "auth-service",
            user("alexey_ivanov", "alexey@example.com", "create"),
        )
        .with_timestamp(at(0)),
        Event::new(
            "evt_user_002",
            EventType::UserUpdated,
            "user-service",
            user("alexey_ivanov_pro", "alexey.new@example.com", "update"),
        )
        .with_timestamp(at(5)),
        Event::new(
            "evt_order_001",
            EventType::OrderPlaced,
            "order-service",
            order("placed"),
        )
        .with_timestamp(at(10)),
        Event::new(
            "evt_payment_001",
            EventType::PaymentSuccess,
            "payment-service",
            EventPayload::Payment(PaymentData {
                payment_id: "pay_9001".to_owned(),
                order_id: ORDER_ID.to_owned(),
                amount: 249.99,
                currency: "USD".to_owned(),
                status: PaymentStatus::Success,
                method: "credit_card".to_owned(),
                failed_reason: None,
                refund_amount: None,
            }),
        )
        .with_timestamp(at(12)),
        Event::new(
            "evt_inventory_001",
            EventType::InventoryLow,
            "inventory-service",
            EventPayload::Inventory(InventoryData {
                product_id: "prod_101".to_owned(),
                product_name: "Book: Systems Programming in Practice".to_owned(),
                current_quantity: 3,
                min_required_quantity: 10,
                warehouse: "Moscow warehouse".to_owned(),
                urgency: Urgency::High,
            }),
        )
        .with_timestamp(at(15)),
        Event::new(
            "evt_order_002",
            EventType::OrderShipped,
            "shipping-service",
            order("shipped"),
        )
        .with_timestamp(at(20)),
        Event::new(
            "evt_review_001",
            EventType::ReviewAdded,
            "review-service",
            EventPayload::Review(ReviewData {
                review_id: "rev_001".to_owned(),
                product_id: "prod_101".to_owned(),
                user_id: USER_ID.to_owned(),
                rating: 5,
                title: "Excellent book!".to_owned(),
                comment: Some("Got me productive in two weeks".to_owned()),
                verified_purchase: true,
            }),
        )
        .with_timestamp(at(25)),
        Event::new(
            "evt_promo_001",
            EventType::PromoCodeUsed,
            "order-service",
            EventPayload::PromoCode(PromoCodeData {
                code: "WELCOME10".to_owned(),
                user_id: USER_ID.to_owned(),
                order_id: ORDER_ID.to_owned(),
                discount_amount: 24.99,
                discount_percent: Some(10.0),
                min_order_amount: Some(100.0),
            }),
        )
        .with_timestamp(at(28)),
        Event::new(
            "evt_alert_001",
            EventType::SystemAlert,
            "monitoring",
            EventPayload::Alert(AlertData {
                severity: "WARNING".to_owned(),
                service: "payment-service".to_owned(),
                message: "Payment API response time is high (>500ms)".to_owned(),
                code: Some("PERF_SLOW".to_owned()),
                action: "Check the logs, scale up resources".to_owned(),
            }),
        )
        .with_timestamp(at(30)),
        Event::new(
            "evt_payment_002",
            EventType::PaymentRefunded,
            "payment-service",
            EventPayload::Payment(PaymentData {
                payment_id: "pay_9002".to_owned(),
                order_id: "order_5000".to_owned(),
                amount: 99.99,
                currency: "USD".to_owned(),
                status: PaymentStatus::Refunded,
                method: "credit_card".to_owned(),
                failed_reason: None,
                refund_amount: Some(99.99),
            }),
        )
        .with_timestamp(at(35)),
    ]
}
