//! Standard wiring of the domain handlers.

use std::sync::Arc;

use courier_events::{
    DispatchResult, EventDispatcher, EventHandler, EventType, HandlerRegistry,
};

use crate::analytics::AnalyticsService;
use crate::inventory::InventoryManager;
use crate::latency::Latency;
use crate::notification::NotificationService;
use crate::order::OrderProcessor;
use crate::payment::PaymentGateway;
use crate::user::UserManager;

/// One instance of every domain handler.
///
/// The fields stay readable after registration, so callers can report
/// handler-level counters once the dispatcher has stopped.
#[derive(Debug, Clone)]
pub struct Services {
    /// Handles `USER_*`.
    pub users: Arc<UserManager>,
    /// Handles `ORDER_*`.
    pub orders: Arc<OrderProcessor>,
    /// Handles `PAYMENT_*`.
    pub payments: Arc<PaymentGateway>,
    /// Handles `INVENTORY_LOW`.
    pub inventory: Arc<InventoryManager>,
    /// Handles every type.
    pub analytics: Arc<AnalyticsService>,
    /// Handles shipments, successful payments, reviews and promo codes.
    pub notifications: Arc<NotificationService>,
}

impl Services {
    /// Create every handler with the given latency behavior.
    #[must_use]
    pub fn new(latency: Latency) -> Self {
        Self {
            users: Arc::new(UserManager::new("UserManager").with_latency(latency)),
            orders: Arc::new(OrderProcessor::new("OrderProcessor").with_latency(latency)),
            payments: Arc::new(PaymentGateway::new("PaymentGateway").with_latency(latency)),
            inventory: Arc::new(InventoryManager::new("InventoryManager").with_latency(latency)),
            analytics: Arc::new(AnalyticsService::new("Analytics").with_latency(latency)),
            notifications: Arc::new(
                NotificationService::new("NotificationService").with_latency(latency),
            ),
        }
    }

    /// Every `(type, handler)` pair, in registration order.
    #[must_use]
    pub fn routes(&self) -> Vec<(EventType, Arc<dyn EventHandler>)> {
        let users: Arc<dyn EventHandler> = self.users.clone();
        let orders: Arc<dyn EventHandler> = self.orders.clone();
        let payments: Arc<dyn EventHandler> = self.payments.clone();
        let inventory: Arc<dyn EventHandler> = self.inventory.clone();
        let analytics: Arc<dyn EventHandler> = self.analytics.clone();
        let notifications: Arc<dyn EventHandler> = self.notifications.clone();

        let mut routes = vec![
            (EventType::UserCreated, Arc::clone(&users)),
            (EventType::UserUpdated, Arc::clone(&users)),
            (EventType::UserDeleted, users),
            (EventType::OrderPlaced, Arc::clone(&orders)),
            (EventType::OrderCancelled, Arc::clone(&orders)),
            (EventType::OrderShipped, orders),
            (EventType::PaymentSuccess, Arc::clone(&payments)),
            (EventType::PaymentFailed, Arc::clone(&payments)),
            (EventType::PaymentRefunded, payments),
            (EventType::InventoryLow, inventory),
            (EventType::ReviewAdded, Arc::clone(&notifications)),
            (EventType::PromoCodeUsed, Arc::clone(&notifications)),
            (EventType::OrderShipped, Arc::clone(&notifications)),
            (EventType::PaymentSuccess, notifications),
        ];
        routes.extend(
            EventType::ALL
                .iter()
                .map(|t| (*t, Arc::clone(&analytics))),
        );
        routes
    }

    /// A registry holding [`routes`](Self::routes).
    #[must_use]
    pub fn registry(&self) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        for (event_type, handler) in self.routes() {
            registry.register(event_type, handler);
        }
        registry
    }

    /// Register [`routes`](Self::routes) on a dispatcher that has not started.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidState`](courier_events::DispatchError)
    /// if the dispatcher has already started.
    pub fn register_all(&self, dispatcher: &mut EventDispatcher) -> DispatchResult<()> {
        for (event_type, handler) in self.routes() {
            dispatcher.register(event_type, handler)?;
        }
        Ok(())
    }
}

impl Default for Services {
    fn default() -> Self {
        Self::new(Latency::default())
    }
}
