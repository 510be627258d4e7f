//! Mapping from event type to subscribed handlers.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::event::EventType;
use crate::handler::EventHandler;

/// Event type to handler mapping.
///
/// The registry has no interior locking. It is mutated through `&mut`
/// while the dispatcher is being configured, then frozen behind an `Arc`
/// when the dispatcher starts, after which it is read-only.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<EventType, Vec<Arc<dyn EventHandler>>>,
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes: HashMap<EventType, Vec<&str>> = self
            .handlers
            .iter()
            .map(|(t, hs)| (*t, hs.iter().map(|h| h.name()).collect()))
            .collect();
        f.debug_struct("HandlerRegistry")
            .field("routes", &routes)
            .finish()
    }
}

impl HandlerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Append a handler to the sequence for `event_type`.
    ///
    /// No uniqueness check is made: registering the same handler twice for
    /// one type makes it run twice per event.
    pub fn register(&mut self, event_type: EventType, handler: Arc<dyn EventHandler>) {
        debug!(
            event_type = %event_type,
            handler = %handler.name(),
            "Handler registered"
        );
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Handlers registered for `event_type`, in registration order.
    #[must_use]
    pub fn handlers_for(&self, event_type: EventType) -> &[Arc<dyn EventHandler>] {
        self.handlers
            .get(&event_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of registrations for `event_type`.
    #[must_use]
    pub fn handler_count(&self, event_type: EventType) -> usize {
        self.handlers_for(event_type).len()
    }

    /// Event types with at least one handler, sorted.
    #[must_use]
    pub fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = self
            .handlers
            .iter()
            .filter(|(_, hs)| !hs.is_empty())
            .map(|(t, _)| *t)
            .collect();
        types.sort_unstable();
        types
    }

    /// Total number of registrations across all types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Check if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::handler::HandlerResult;
    use async_trait::async_trait;

    struct Named(&'static str);

    #[async_trait]
    impl EventHandler for Named {
        async fn handle(&self, _event: &Event) -> HandlerResult {
            Ok(())
        }

        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_register_preserves_order() {
        let mut registry = HandlerRegistry::new();
        registry.register(EventType::OrderPlaced, Arc::new(Named("first")));
        registry.register(EventType::OrderPlaced, Arc::new(Named("second")));

        let names: Vec<&str> = registry
            .handlers_for(EventType::OrderPlaced)
            .iter()
            .map(|h| h.name())
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_duplicate_registration_is_kept() {
        let mut registry = HandlerRegistry::new();
        let handler: Arc<dyn EventHandler> = Arc::new(Named("dup"));
        registry.register(EventType::ReviewAdded, Arc::clone(&handler));
        registry.register(EventType::ReviewAdded, handler);

        assert_eq!(registry.handler_count(EventType::ReviewAdded), 2);
    }

    #[test]
    fn test_one_handler_many_types() {
        let mut registry = HandlerRegistry::new();
        let handler: Arc<dyn EventHandler> = Arc::new(Named("shared"));
        registry.register(EventType::PaymentSuccess, Arc::clone(&handler));
        registry.register(EventType::OrderPlaced, handler);

        assert_eq!(
            registry.event_types(),
            vec![EventType::OrderPlaced, EventType::PaymentSuccess]
        );
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_unknown_type_has_no_handlers() {
        let registry = HandlerRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.handlers_for(EventType::InventoryLow).is_empty());
        assert_eq!(registry.handler_count(EventType::InventoryLow), 0);
    }
}
