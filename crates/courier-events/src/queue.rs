//! Bounded FIFO ingestion queue with an explicit close sentinel.
//!
//! Producers hold cloned senders for as long as they like, so the channel
//! cannot be closed by dropping senders. Instead the owning dispatcher
//! pushes a single [`QueueItem::Close`] after the last accepted event; the
//! consumer stops at the sentinel once everything ahead of it is drained.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::MAX_QUEUE_CAPACITY;
use crate::error::{DispatchError, DispatchResult};
use crate::event::Event;

enum QueueItem {
    Event(Arc<Event>),
    Close,
}

/// Create a queue holding at most `capacity` items, clamped to
/// `1..=MAX_QUEUE_CAPACITY`.
pub(crate) fn bounded(capacity: usize) -> (QueueSender, QueueReceiver) {
    let (tx, rx) = mpsc::channel(capacity.clamp(1, MAX_QUEUE_CAPACITY));
    (QueueSender { tx }, QueueReceiver { rx })
}

/// Producer side of the ingestion queue.
#[derive(Debug, Clone)]
pub(crate) struct QueueSender {
    tx: mpsc::Sender<QueueItem>,
}

impl QueueSender {
    /// Push an event, waiting for capacity if the queue is full.
    pub(crate) async fn push(&self, event: Arc<Event>) -> DispatchResult<()> {
        self.tx
            .send(QueueItem::Event(event))
            .await
            .map_err(|_| DispatchError::Closed)
    }

    /// Push the close sentinel.
    pub(crate) async fn close(&self) -> DispatchResult<()> {
        self.tx
            .send(QueueItem::Close)
            .await
            .map_err(|_| DispatchError::Closed)
    }

    /// Free slots right now.
    pub(crate) fn available(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consumer side of the ingestion queue.
#[derive(Debug)]
pub(crate) struct QueueReceiver {
    rx: mpsc::Receiver<QueueItem>,
}

impl QueueReceiver {
    /// Next event in FIFO order.
    ///
    /// Waits while the queue is empty. Returns `None` at the close sentinel
    /// or when every sender is gone.
    pub(crate) async fn next(&mut self) -> Option<Arc<Event>> {
        match self.rx.recv().await {
            Some(QueueItem::Event(event)) => Some(event),
            Some(QueueItem::Close) | None => None,
        }
    }
}

impl std::fmt::Debug for QueueItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Event(event) => f.debug_tuple("Event").field(&event.id).finish(),
            Self::Close => f.write_str("Close"),
        }
    }
}
