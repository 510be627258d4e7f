//! User lifecycle handler.

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, info};

use courier_events::{Event, EventHandler, EventPayload, EventType, HandlerError, HandlerResult};

use crate::latency::Latency;

/// Tracks how many users exist.
#[derive(Debug)]
pub struct UserManager {
    name: String,
    latency: Latency,
    user_count: Mutex<i64>,
}

impl UserManager {
    /// Create a user manager with simulated latency.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Latency::default(),
            user_count: Mutex::new(0),
        }
    }

    /// Set the latency behavior.
    #[must_use]
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Current user count. Goes negative if deletes outnumber creates.
    #[must_use]
    pub fn user_count(&self) -> i64 {
        self.user_count.lock().map(|g| *g).unwrap_or_default()
    }

    fn adjust(&self, delta: i64) -> Result<i64, HandlerError> {
        let mut count = self
            .user_count
            .lock()
            .map_err(|e| HandlerError::Internal(e.to_string()))?;
        *count = count.saturating_add(delta);
        Ok(*count)
    }
}

#[async_trait]
impl EventHandler for UserManager {
    async fn handle(&self, event: &Event) -> HandlerResult {
        let EventPayload::User(user) = &event.payload else {
            debug!(handler = %self.name, event_id = %event.id, "ignoring non-user payload");
            return Ok(());
        };

        match event.event_type {
            EventType::UserCreated => {
                let total = self.adjust(1)?;
                info!(
                    handler = %self.name,
                    username = %user.username,
                    email = %user.email,
                    total,
                    "user created"
                );
                self.latency.pause(50, 100).await;
            },
            EventType::UserUpdated => {
                info!(handler = %self.name, user_id = %user.user_id, "user updated");
                self.latency.pause(30, 80).await;
            },
            EventType::UserDeleted => {
                let remaining = self.adjust(-1)?;
                info!(
                    handler = %self.name,
                    user_id = %user.user_id,
                    remaining,
                    "user deleted"
                );
                self.latency.pause(60, 120).await;
            },
            other => {
                debug!(handler = %self.name, event_type = %other, "ignoring event type");
            },
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_test::{test_event, test_user_created};

    fn manager() -> UserManager {
        UserManager::new("users").with_latency(Latency::Disabled)
    }

    fn with_type(mut event: Event, event_type: EventType) -> Event {
        event.event_type = event_type;
        event
    }

    #[tokio::test]
    async fn test_create_and_delete_adjust_count() {
        let users = manager();

        users.handle(&test_user_created("e1", "u1")).await.unwrap();
        users.handle(&test_user_created("e2", "u2")).await.unwrap();
        assert_eq!(users.user_count(), 2);

        let delete = with_type(test_user_created("e3", "u1"), EventType::UserDeleted);
        users.handle(&delete).await.unwrap();
        assert_eq!(users.user_count(), 1);
    }

    #[tokio::test]
    async fn test_update_leaves_count() {
        let users = manager();
        let update = with_type(test_user_created("e1", "u1"), EventType::UserUpdated);

        users.handle(&update).await.unwrap();
        assert_eq!(users.user_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_payload_is_ignored() {
        let users = manager();
        users
            .handle(&test_event("e1", EventType::UserCreated))
            .await
            .unwrap();
        assert_eq!(users.user_count(), 0);
    }
}
