//! Test fixtures for events.

use chrono::{DateTime, TimeZone, Utc};

use courier_events::{
    Event, EventPayload, EventType, InventoryData, OrderData, OrderItem, Urgency, UserData,
};

/// Fixed timestamp used by fixtures so assertions are deterministic.
#[must_use]
pub fn test_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Create an event with an empty payload.
#[must_use]
pub fn test_event(id: &str, event_type: EventType) -> Event {
    Event::new(id, event_type, "test-suite", EventPayload::Empty).with_timestamp(test_timestamp())
}

/// Create `count` events of one type with ids `{prefix}-0`, `{prefix}-1`, ...
#[must_use]
pub fn test_events(prefix: &str, event_type: EventType, count: usize) -> Vec<Event> {
    (0..count)
        .map(|i| test_event(&format!("{prefix}-{i}"), event_type))
        .collect()
}

/// Create a `USER_CREATED` event with a user payload.
#[must_use]
pub fn test_user_created(id: &str, user_id: &str) -> Event {
    Event::new(
        id,
        EventType::UserCreated,
        "auth-service",
        EventPayload::User(UserData {
            user_id: user_id.to_string(),
            username: format!("{user_id}_name"),
            email: format!("{user_id}@example.com"),
            action: "create".to_string(),
        }),
    )
    .with_timestamp(test_timestamp())
}

/// Create an `ORDER_PLACED` event with a single-item order payload.
#[must_use]
pub fn test_order_placed(id: &str, order_id: &str) -> Event {
    Event::new(
        id,
        EventType::OrderPlaced,
        "order-service",
        EventPayload::Order(OrderData {
            order_id: order_id.to_string(),
            user_id: "user_1".to_string(),
            total_amount: 19.99,
            status: "placed".to_string(),
            items: vec![OrderItem {
                product_id: "prod_1".to_string(),
                name: "Widget".to_string(),
                quantity: 1,
                price: 19.99,
            }],
            shipping_address: "1 Test Street".to_string(),
            reason: None,
        }),
    )
    .with_timestamp(test_timestamp())
}

/// Create an `INVENTORY_LOW` event with the given urgency.
#[must_use]
pub fn test_inventory_low(id: &str, urgency: Urgency) -> Event {
    Event::new(
        id,
        EventType::InventoryLow,
        "inventory-service",
        EventPayload::Inventory(InventoryData {
            product_id: "prod_1".to_string(),
            product_name: "Widget".to_string(),
            current_quantity: 2,
            min_required_quantity: 10,
            warehouse: "main".to_string(),
            urgency,
        }),
    )
    .with_timestamp(test_timestamp())
}
