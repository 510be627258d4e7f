//! Lifecycle controller, dispatch loop and fan-out executor.

use futures::FutureExt;
use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::task::TaskTracker;
use tracing::{Instrument, debug, debug_span, error, info, trace, warn};

use crate::config::{DispatcherConfig, SubmitMode};
use crate::error::{DispatchError, DispatchResult};
use crate::event::{Event, EventType};
use crate::handler::{EventHandler, HandlerError, HandlerResult};
use crate::queue::{self, QueueReceiver, QueueSender};
use crate::registry::HandlerRegistry;
use crate::stats::{DispatchStats, StatsSnapshot};

/// Dispatcher lifecycle state.
///
/// Transitions are linear: `Created → Running → Stopping → Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Handlers may be registered; nothing is consumed yet.
    Created,
    /// The dispatch loop is running and submissions are accepted.
    Running,
    /// Submissions are rejected; buffered events are being drained.
    Stopping,
    /// The dispatch loop has exited.
    Stopped,
}

impl fmt::Display for DispatcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// State shared between the controller, submitters and the dispatch loop.
#[derive(Debug)]
struct Shared {
    /// Held for reading across every queue push, so `stop()` can only
    /// flip to `Stopping` between pushes.
    state: RwLock<DispatcherState>,
    stats: DispatchStats,
    /// Detached hand-off tasks still waiting to push.
    handoffs: TaskTracker,
    submit_mode: SubmitMode,
}

/// Cloneable producer handle.
///
/// Lets tasks other than the dispatcher's owner submit events. Submissions
/// made after `stop()` has begun fail with [`DispatchError::Closed`].
#[derive(Debug, Clone)]
pub struct EventSubmitter {
    shared: Arc<Shared>,
    sender: QueueSender,
}

impl EventSubmitter {
    /// Submit an event for dispatch.
    ///
    /// In [`SubmitMode::Blocking`] this waits for queue capacity. In
    /// [`SubmitMode::Detached`] it returns as soon as a hand-off task has
    /// been spawned.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidState`] before `start()` and
    /// [`DispatchError::Closed`] once `stop()` has begun.
    pub async fn submit(&self, event: Event) -> DispatchResult<()> {
        let state = self.shared.state.read().await;
        match *state {
            DispatcherState::Running => {},
            DispatcherState::Created => {
                return Err(DispatchError::InvalidState {
                    operation: "submit",
                    state: DispatcherState::Created,
                });
            },
            DispatcherState::Stopping | DispatcherState::Stopped => {
                warn!(event_id = %event.id, "Submission rejected, dispatcher is closing");
                return Err(DispatchError::Closed);
            },
        }

        self.shared.stats.record_dispatched();
        debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            source = %event.source,
            queue_free = self.sender.available(),
            "Event submitted"
        );

        let event = Arc::new(event);
        match self.shared.submit_mode {
            SubmitMode::Blocking => self.sender.push(event).await?,
            SubmitMode::Detached => {
                let sender = self.sender.clone();
                self.shared.handoffs.spawn(async move {
                    let event_id = event.id.clone();
                    if let Err(e) = sender.push(event).await {
                        error!(event_id = %event_id, error = %e, "Detached hand-off failed");
                    }
                });
            },
        }

        drop(state);
        Ok(())
    }

    /// Point-in-time dispatch counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.shared.stats.snapshot()
    }
}

/// In-process event dispatcher.
///
/// Register handlers, `start()`, submit events, then `stop()`. Registration
/// and the lifecycle transitions take `&mut self`, so the borrow checker
/// keeps them from racing with submissions made through `&self`.
pub struct EventDispatcher {
    config: DispatcherConfig,
    /// Uniquely owned until `start()`, then shared read-only with the loop.
    registry: Arc<HandlerRegistry>,
    state: DispatcherState,
    submitter: EventSubmitter,
    receiver: Option<QueueReceiver>,
    dispatch_loop: Option<JoinHandle<()>>,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("registry", &self.registry)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(DispatcherConfig::default())
    }
}

impl EventDispatcher {
    /// Create a dispatcher with an empty registry.
    #[must_use]
    pub fn new(config: DispatcherConfig) -> Self {
        Self::with_registry(config, HandlerRegistry::new())
    }

    /// Create a dispatcher around a pre-built registry.
    #[must_use]
    pub fn with_registry(config: DispatcherConfig, registry: HandlerRegistry) -> Self {
        let (sender, receiver) = queue::bounded(config.queue_capacity);
        let shared = Arc::new(Shared {
            state: RwLock::new(DispatcherState::Created),
            stats: DispatchStats::new(),
            handoffs: TaskTracker::new(),
            submit_mode: config.submit_mode,
        });

        Self {
            config,
            registry: Arc::new(registry),
            state: DispatcherState::Created,
            submitter: EventSubmitter { shared, sender },
            receiver: Some(receiver),
            dispatch_loop: None,
        }
    }

    /// Subscribe `handler` to `event_type`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidState`] once the dispatcher has been
    /// started.
    pub fn register(
        &mut self,
        event_type: EventType,
        handler: Arc<dyn EventHandler>,
    ) -> DispatchResult<()> {
        let registry = match Arc::get_mut(&mut self.registry) {
            Some(registry) if self.state == DispatcherState::Created => registry,
            _ => {
                return Err(DispatchError::InvalidState {
                    operation: "register",
                    state: self.state,
                });
            },
        };
        registry.register(event_type, handler);
        Ok(())
    }

    /// Start the dispatch loop.
    ///
    /// Freezes the registry and spawns the loop on the current tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidState`] unless the dispatcher is in
    /// [`DispatcherState::Created`].
    pub async fn start(&mut self) -> DispatchResult<()> {
        let receiver = match self.receiver.take() {
            Some(receiver) if self.state == DispatcherState::Created => receiver,
            _ => {
                return Err(DispatchError::InvalidState {
                    operation: "start",
                    state: self.state,
                });
            },
        };

        let context = LoopContext {
            registry: Arc::clone(&self.registry),
            shared: Arc::clone(&self.submitter.shared),
            handler_timeout: self.config.handler_timeout,
        };
        self.dispatch_loop = Some(tokio::spawn(run_loop(receiver, context)));
        self.transition(DispatcherState::Running).await;

        info!(
            queue_capacity = self.config.queue_capacity,
            submit_mode = ?self.config.submit_mode,
            event_types = self.registry.event_types().len(),
            registrations = self.registry.len(),
            "Dispatcher started"
        );
        Ok(())
    }

    /// Submit an event for dispatch.
    ///
    /// See [`EventSubmitter::submit`].
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidState`] before `start()` and
    /// [`DispatchError::Closed`] once `stop()` has begun.
    pub async fn submit(&self, event: Event) -> DispatchResult<()> {
        self.submitter.submit(event).await
    }

    /// Stop accepting events, drain the queue and wait for the loop to exit.
    ///
    /// Every event accepted before this call is fully processed (all of its
    /// handlers have returned) before this returns. Returns the final
    /// counters.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidState`] unless the dispatcher is
    /// running, or [`DispatchError::LoopFailed`] if the loop task died.
    pub async fn stop(&mut self) -> DispatchResult<StatsSnapshot> {
        if self.state != DispatcherState::Running {
            return Err(DispatchError::InvalidState {
                operation: "stop",
                state: self.state,
            });
        }

        self.transition(DispatcherState::Stopping).await;
        info!("Dispatcher stopping");

        let shared = &self.submitter.shared;
        shared.handoffs.close();
        shared.handoffs.wait().await;

        if let Err(e) = self.submitter.sender.close().await {
            warn!(error = %e, "Close sentinel not delivered");
        }

        let joined = match self.dispatch_loop.take() {
            Some(handle) => handle
                .await
                .map_err(|e| DispatchError::LoopFailed(e.to_string())),
            None => Ok(()),
        };

        self.transition(DispatcherState::Stopped).await;

        let stats = self.stats();
        info!(
            dispatched = stats.dispatched,
            processed = stats.processed,
            failed = stats.failed,
            unhandled = stats.unhandled,
            completed = stats.completed,
            "Dispatcher stopped"
        );

        joined.map(|()| stats)
    }

    /// Cloneable producer handle sharing this dispatcher's queue.
    #[must_use]
    pub fn submitter(&self) -> EventSubmitter {
        self.submitter.clone()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// Point-in-time dispatch counters.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.submitter.stats()
    }

    /// The handler registry.
    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// The configuration this dispatcher was built with.
    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    async fn transition(&mut self, next: DispatcherState) {
        *self.submitter.shared.state.write().await = next;
        debug!(from = %self.state, to = %next, "Dispatcher state changed");
        self.state = next;
    }
}

struct LoopContext {
    registry: Arc<HandlerRegistry>,
    shared: Arc<Shared>,
    handler_timeout: Option<Duration>,
}

/// Single sequential consumer: one event at a time, in queue order.
async fn run_loop(mut receiver: QueueReceiver, context: LoopContext) {
    debug!("Dispatch loop running");
    while let Some(event) = receiver.next().await {
        fan_out(&context, event).await;
    }
    debug!("Dispatch loop drained");
}

/// Invoke every handler for `event` concurrently and wait for all of them.
async fn fan_out(context: &LoopContext, event: Arc<Event>) {
    let stats = &context.shared.stats;
    let handlers = context.registry.handlers_for(event.event_type);

    if handlers.is_empty() {
        debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            "No handlers registered for event"
        );
        stats.record_unhandled();
        stats.record_completed();
        return;
    }

    debug!(
        event_id = %event.id,
        event_type = %event.event_type,
        handlers = handlers.len(),
        "Dispatching event"
    );

    let mut invocations = JoinSet::new();
    for handler in handlers {
        let handler = Arc::clone(handler);
        let event = Arc::clone(&event);
        let timeout = context.handler_timeout;
        let span = debug_span!("handler", handler = %handler.name(), event_id = %event.id);

        invocations.spawn(
            async move {
                let outcome = invoke(handler.as_ref(), &event, timeout).await;
                (handler.name().to_string(), outcome)
            }
            .instrument(span),
        );
    }

    // Barrier: the next event is not dequeued until every invocation returns.
    while let Some(joined) = invocations.join_next().await {
        stats.record_processed();
        match joined {
            Ok((name, Ok(()))) => {
                trace!(event_id = %event.id, handler = %name, "Handler completed");
            },
            Ok((name, Err(e))) => {
                stats.record_failed();
                warn!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    handler = %name,
                    kind = %e.kind(),
                    error = %e,
                    "Handler failed"
                );
            },
            Err(e) => {
                stats.record_failed();
                error!(event_id = %event.id, error = %e, "Handler task did not complete");
            },
        }
    }

    stats.record_completed();
    debug!(event_id = %event.id, "Event fully processed");
}

/// Run one handler, turning panics and timeouts into failure outcomes.
async fn invoke(
    handler: &dyn EventHandler,
    event: &Event,
    timeout: Option<Duration>,
) -> HandlerResult {
    let call = AssertUnwindSafe(handler.handle(event)).catch_unwind();

    let caught = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(caught) => caught,
            Err(_) => {
                return Err(HandlerError::TimedOut {
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                });
            },
        },
        None => call.await,
    };

    caught.unwrap_or_else(|panic| Err(HandlerError::Panicked(panic_message(panic.as_ref()))))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
