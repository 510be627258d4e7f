//! Mock handler implementations for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;

use courier_events::{Event, EventHandler, EventType, HandlerError, HandlerResult};

/// What a handler was doing at a point in the shared journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// `handle` was entered.
    Started,
    /// `handle` is about to return.
    Finished,
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    /// Handler name.
    pub handler: String,
    /// Event being handled.
    pub event_id: String,
    /// Start or finish.
    pub phase: Phase,
}

/// Append-only log shared by several handlers, used to assert ordering
/// across handlers and events.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl Journal {
    /// Create an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, handler: &str, event_id: &str, phase: Phase) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(JournalEntry {
                handler: handler.to_string(),
                event_id: event_id.to_string(),
                phase,
            });
        }
    }

    /// Copy of every entry, in recording order.
    #[must_use]
    pub fn entries(&self) -> Vec<JournalEntry> {
        self.entries
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    /// Position of the first entry matching `handler`, `event_id` and `phase`.
    #[must_use]
    pub fn position(&self, handler: &str, event_id: &str, phase: Phase) -> Option<usize> {
        self.entries()
            .iter()
            .position(|e| e.handler == handler && e.event_id == event_id && e.phase == phase)
    }

    /// Position of the last `Finished` entry for `event_id`.
    #[must_use]
    pub fn last_finish_of(&self, event_id: &str) -> Option<usize> {
        self.entries()
            .iter()
            .rposition(|e| e.event_id == event_id && e.phase == Phase::Finished)
    }

    /// Position of the first `Started` entry for `event_id`.
    #[must_use]
    pub fn first_start_of(&self, event_id: &str) -> Option<usize> {
        self.position_where(|e| e.event_id == event_id && e.phase == Phase::Started)
    }

    fn position_where(&self, predicate: impl Fn(&JournalEntry) -> bool) -> Option<usize> {
        self.entries().iter().position(predicate)
    }
}

/// Handler that records every event it receives.
///
/// Clones share the same recording, so a test can keep one clone and
/// register another.
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    name: String,
    received: Arc<Mutex<Vec<Event>>>,
    journal: Option<Journal>,
    delay: Option<Duration>,
}

impl RecordingHandler {
    /// Create a recording handler.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            received: Arc::new(Mutex::new(Vec::new())),
            journal: None,
            delay: None,
        }
    }

    /// Also write start/finish entries to `journal`.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Sleep for `delay` inside every `handle` call.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Upcast for registration.
    #[must_use]
    pub fn into_dyn(self) -> Arc<dyn EventHandler> {
        Arc::new(self)
    }

    /// Every event received, in arrival order.
    #[must_use]
    pub fn received(&self) -> Vec<Event> {
        self.received
            .lock()
            .map(|g| g.clone())
            .unwrap_or_default()
    }

    /// Ids of every event received, in arrival order.
    #[must_use]
    pub fn event_ids(&self) -> Vec<String> {
        self.received().into_iter().map(|e| e.id).collect()
    }

    /// Number of `handle` calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.received.lock().map(|g| g.len()).unwrap_or_default()
    }

    /// Number of `handle` calls for events of `event_type`.
    #[must_use]
    pub fn count_for(&self, event_type: EventType) -> usize {
        self.received()
            .iter()
            .filter(|e| e.event_type == event_type)
            .count()
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle(&self, event: &Event) -> HandlerResult {
        if let Some(journal) = &self.journal {
            journal.record(&self.name, &event.id, Phase::Started);
        }
        if let Ok(mut guard) = self.received.lock() {
            guard.push(event.clone());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(journal) = &self.journal {
            journal.record(&self.name, &event.id, Phase::Finished);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handler that always fails with a fixed error.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    name: String,
    error: HandlerError,
    calls: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// Create a handler that fails with `error`.
    #[must_use]
    pub fn new(name: impl Into<String>, error: HandlerError) -> Self {
        Self {
            name: name.into(),
            error,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a handler that rejects every event.
    #[must_use]
    pub fn rejecting(name: impl Into<String>) -> Self {
        Self::new(name, HandlerError::rejected("rejected by mock"))
    }

    /// Upcast for registration.
    #[must_use]
    pub fn into_dyn(self) -> Arc<dyn EventHandler> {
        Arc::new(self)
    }

    /// Number of `handle` calls.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventHandler for FailingHandler {
    async fn handle(&self, _event: &Event) -> HandlerResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handler that panics on every call.
#[derive(Debug, Clone)]
pub struct PanickingHandler {
    name: String,
}

impl PanickingHandler {
    /// Create a panicking handler.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl EventHandler for PanickingHandler {
    #[allow(clippy::panic)]
    async fn handle(&self, event: &Event) -> HandlerResult {
        panic!("{} refused {}", self.name, event.id);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Handler whose `handle` calls park until the test opens its gate.
///
/// Used to hold the dispatch loop inside a barrier and observe head-of-line
/// blocking.
#[derive(Debug, Clone)]
pub struct GatedHandler {
    name: String,
    gate: watch::Sender<bool>,
    entered: watch::Sender<usize>,
    journal: Option<Journal>,
}

impl GatedHandler {
    /// Create a handler with a closed gate.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let (gate, _) = watch::channel(false);
        let (entered, _) = watch::channel(0);
        Self {
            name: name.into(),
            gate,
            entered,
            journal: None,
        }
    }

    /// Also write start/finish entries to `journal`.
    #[must_use]
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Upcast for registration.
    #[must_use]
    pub fn into_dyn(self) -> Arc<dyn EventHandler> {
        Arc::new(self)
    }

    /// Let every parked and future call proceed.
    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    /// Number of calls that have entered `handle`.
    #[must_use]
    pub fn entered(&self) -> usize {
        *self.entered.borrow()
    }

    /// Wait until at least `count` calls have entered `handle`.
    pub async fn wait_until_entered(&self, count: usize) {
        let mut rx = self.entered.subscribe();
        let _ = rx.wait_for(|n| *n >= count).await;
    }
}

#[async_trait]
impl EventHandler for GatedHandler {
    async fn handle(&self, event: &Event) -> HandlerResult {
        if let Some(journal) = &self.journal {
            journal.record(&self.name, &event.id, Phase::Started);
        }
        self.entered.send_modify(|n| *n = n.saturating_add(1));

        let mut gate = self.gate.subscribe();
        gate.wait_for(|open| *open)
            .await
            .map_err(|e| HandlerError::Internal(e.to_string()))?;

        if let Some(journal) = &self.journal {
            journal.record(&self.name, &event.id, Phase::Finished);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
