//! Analytics handler.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use tracing::info;

use courier_events::{Event, EventHandler, EventType, HandlerError, HandlerResult};

use crate::latency::Latency;

/// Counts every event it sees, per type. Usually registered for all types.
#[derive(Debug)]
pub struct AnalyticsService {
    name: String,
    latency: Latency,
    counts: RwLock<HashMap<EventType, u64>>,
}

impl AnalyticsService {
    /// Create an analytics service with simulated latency.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latency: Latency::default(),
            counts: RwLock::new(HashMap::new()),
        }
    }

    /// Set the latency behavior.
    #[must_use]
    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    /// Events seen of `event_type`.
    #[must_use]
    pub fn count_for(&self, event_type: EventType) -> u64 {
        self.counts
            .read()
            .ok()
            .and_then(|counts| counts.get(&event_type).copied())
            .unwrap_or_default()
    }

    /// Events seen across all types.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts
            .read()
            .map(|counts| counts.values().fold(0u64, |acc, n| acc.saturating_add(*n)))
            .unwrap_or_default()
    }

    /// Per-type counts, ordered as [`EventType::ALL`], omitting zeros.
    #[must_use]
    pub fn breakdown(&self) -> Vec<(EventType, u64)> {
        EventType::ALL
            .iter()
            .map(|t| (*t, self.count_for(*t)))
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

#[async_trait]
impl EventHandler for AnalyticsService {
    async fn handle(&self, event: &Event) -> HandlerResult {
        let total = {
            let mut counts = self
                .counts
                .write()
                .map_err(|e| HandlerError::Internal(e.to_string()))?;
            let entry = counts.entry(event.event_type).or_insert(0);
            *entry = entry.saturating_add(1);
            counts.values().fold(0u64, |acc, n| acc.saturating_add(*n))
        };

        info!(handler = %self.name, event_type = %event.event_type, total, "event counted");

        self.latency.pause(10, 50).await;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
