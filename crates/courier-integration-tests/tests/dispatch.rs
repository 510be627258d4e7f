//! End-to-end dispatch behavior through the public API.

#![allow(clippy::arithmetic_side_effects)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use courier_events::{
    DispatchError, DispatcherConfig, DispatcherState, EventDispatcher, EventType, HandlerError,
    SubmitMode,
};
use courier_test::{
    FailingHandler, GatedHandler, Journal, PanickingHandler, Phase, RecordingHandler,
    init_test_logging, test_event, test_events, test_order_placed,
};

use common::{wait_for_completed, within};

#[tokio::test]
async fn test_fan_out_to_every_subscriber() {
    init_test_logging();
    let h1 = RecordingHandler::new("h1");
    let h2 = RecordingHandler::new("h2");
    let h2_dyn = h2.clone().into_dyn();

    let mut dispatcher = EventDispatcher::default();
    dispatcher
        .register(EventType::OrderPlaced, h1.clone().into_dyn())
        .unwrap();
    dispatcher
        .register(EventType::OrderPlaced, Arc::clone(&h2_dyn))
        .unwrap();
    dispatcher
        .register(EventType::PaymentSuccess, h2_dyn)
        .unwrap();
    dispatcher.start().await.unwrap();

    let event = test_order_placed("e1", "order_1");
    dispatcher.submit(event.clone()).await.unwrap();

    let stats = wait_for_completed(&dispatcher, 1).await;
    assert_eq!(stats.processed, 2);
    assert_eq!(h1.received(), vec![event.clone()]);
    assert_eq!(h2.received(), vec![event]);

    dispatcher.stop().await.unwrap();
}

#[tokio::test]
async fn test_unsubscribed_type_is_counted_as_unhandled() {
    let recorder = RecordingHandler::new("orders");
    let mut dispatcher = EventDispatcher::default();
    dispatcher
        .register(EventType::OrderPlaced, recorder.clone().into_dyn())
        .unwrap();
    dispatcher.start().await.unwrap();

    dispatcher
        .submit(test_event("stock", EventType::InventoryLow))
        .await
        .unwrap();
    let stats = dispatcher.stop().await.unwrap();

    assert_eq!(stats.dispatched, 1);
    assert_eq!(stats.processed, 0);
    assert_eq!(stats.unhandled, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(recorder.call_count(), 0);
}

#[tokio::test]
async fn test_next_event_waits_for_the_barrier() {
    let journal = Journal::new();
    let gated = GatedHandler::new("gated").with_journal(journal.clone());
    let handler = gated.clone().into_dyn();

    let mut dispatcher = EventDispatcher::default();
    dispatcher
        .register(EventType::OrderPlaced, Arc::clone(&handler))
        .unwrap();
    dispatcher
        .register(EventType::PaymentSuccess, handler)
        .unwrap();
    dispatcher.start().await.unwrap();

    dispatcher
        .submit(test_event("a", EventType::OrderPlaced))
        .await
        .unwrap();
    dispatcher
        .submit(test_event("b", EventType::PaymentSuccess))
        .await
        .unwrap();

    within("first invocation", gated.wait_until_entered(1)).await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(gated.entered(), 1, "b started while a was still in flight");
    assert!(journal.first_start_of("b").is_none());

    gated.open();
    let stats = within("stop", dispatcher.stop()).await.unwrap();

    assert_eq!(stats.completed, 2);
    let a_done = journal.last_finish_of("a").unwrap();
    let b_started = journal.first_start_of("b").unwrap();
    assert!(a_done < b_started);
}

#[tokio::test]
async fn test_handlers_of_one_event_run_concurrently() {
    let first = GatedHandler::new("first");
    let second = GatedHandler::new("second");

    let mut dispatcher = EventDispatcher::default();
    dispatcher
        .register(EventType::SystemAlert, first.clone().into_dyn())
        .unwrap();
    dispatcher
        .register(EventType::SystemAlert, second.clone().into_dyn())
        .unwrap();
    dispatcher.start().await.unwrap();

    dispatcher
        .submit(test_event("alert", EventType::SystemAlert))
        .await
        .unwrap();

    // Both are parked at once, so neither waited for the other.
    within("first handler", first.wait_until_entered(1)).await;
    within("second handler", second.wait_until_entered(1)).await;
    assert_eq!(dispatcher.stats().completed, 0);

    first.open();
    second.open();
    let stats = within("stop", dispatcher.stop()).await.unwrap();
    assert_eq!(stats.processed, 2);
    assert_eq!(stats.completed, 1);
}

#[tokio::test]
async fn test_stop_drains_accepted_events() {
    let recorder = RecordingHandler::new("slow").with_delay(Duration::from_millis(20));
    let mut dispatcher = EventDispatcher::default();
    dispatcher
        .register(EventType::UserCreated, recorder.clone().into_dyn())
        .unwrap();
    dispatcher.start().await.unwrap();

    for event in test_events("u", EventType::UserCreated, 3) {
        dispatcher.submit(event).await.unwrap();
    }
    let stats = dispatcher.stop().await.unwrap();

    assert_eq!(dispatcher.state(), DispatcherState::Stopped);
    assert_eq!(recorder.event_ids(), vec!["u-0", "u-1", "u-2"]);
    assert_eq!(stats.dispatched, 3);
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.unhandled, 0);
    assert_eq!(stats.completed, 3);
}

#[tokio::test]
async fn test_invocations_match_subscriber_count() {
    for subscribers in 0..=3usize {
        let handlers: Vec<RecordingHandler> = (0..subscribers)
            .map(|i| RecordingHandler::new(format!("h{i}")))
            .collect();

        let mut dispatcher = EventDispatcher::default();
        for handler in &handlers {
            dispatcher
                .register(EventType::ReviewAdded, handler.clone().into_dyn())
                .unwrap();
        }
        dispatcher.start().await.unwrap();

        let event = test_event("review", EventType::ReviewAdded);
        dispatcher.submit(event.clone()).await.unwrap();
        let stats = dispatcher.stop().await.unwrap();

        assert_eq!(stats.dispatched, 1);
        assert_eq!(stats.processed, subscribers as u64);
        assert_eq!(stats.unhandled, u64::from(subscribers == 0));
        for handler in &handlers {
            assert_eq!(handler.received(), vec![event.clone()]);
        }
    }
}

#[tokio::test]
async fn test_dispatched_counts_every_accepted_submit() {
    let mut dispatcher = EventDispatcher::default();
    dispatcher
        .register(
            EventType::OrderCancelled,
            RecordingHandler::new("orders").into_dyn(),
        )
        .unwrap();
    dispatcher.start().await.unwrap();

    for (i, event) in test_events("c", EventType::OrderCancelled, 5)
        .into_iter()
        .enumerate()
    {
        dispatcher.submit(event).await.unwrap();
        assert_eq!(dispatcher.stats().dispatched, i as u64 + 1);
    }

    let stats = dispatcher.stop().await.unwrap();
    assert_eq!(stats.dispatched, 5);
    assert_eq!(stats.processed, 5);
}

#[tokio::test]
async fn test_failures_are_isolated() {
    init_test_logging();
    let healthy = RecordingHandler::new("healthy");
    let failing = FailingHandler::new(
        "failing",
        HandlerError::Unavailable("gateway down".to_string()),
    );

    let mut dispatcher = EventDispatcher::default();
    dispatcher
        .register(EventType::PaymentFailed, failing.clone().into_dyn())
        .unwrap();
    dispatcher
        .register(
            EventType::PaymentFailed,
            Arc::new(PanickingHandler::new("panicking")),
        )
        .unwrap();
    dispatcher
        .register(EventType::PaymentFailed, healthy.clone().into_dyn())
        .unwrap();
    dispatcher
        .register(EventType::PaymentRefunded, healthy.clone().into_dyn())
        .unwrap();
    dispatcher.start().await.unwrap();

    dispatcher
        .submit(test_event("p1", EventType::PaymentFailed))
        .await
        .unwrap();
    dispatcher
        .submit(test_event("p2", EventType::PaymentRefunded))
        .await
        .unwrap();
    let stats = dispatcher.stop().await.unwrap();

    assert_eq!(healthy.event_ids(), vec!["p1", "p2"]);
    assert_eq!(failing.call_count(), 1);
    assert_eq!(stats.processed, 4);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.succeeded(), 2);
    assert_eq!(stats.completed, 2);
}

#[tokio::test]
async fn test_timed_out_handler_does_not_stall_the_queue() {
    let stuck = GatedHandler::new("stuck");
    let recorder = RecordingHandler::new("next");
    let config = DispatcherConfig::default().with_handler_timeout(Duration::from_millis(30));

    let mut dispatcher = EventDispatcher::new(config);
    dispatcher
        .register(EventType::UserDeleted, stuck.clone().into_dyn())
        .unwrap();
    dispatcher
        .register(EventType::UserUpdated, recorder.clone().into_dyn())
        .unwrap();
    dispatcher.start().await.unwrap();

    dispatcher
        .submit(test_event("gone", EventType::UserDeleted))
        .await
        .unwrap();
    dispatcher
        .submit(test_event("changed", EventType::UserUpdated))
        .await
        .unwrap();
    let stats = within("stop", dispatcher.stop()).await.unwrap();

    assert_eq!(recorder.event_ids(), vec!["changed"]);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.completed, 2);
}

#[tokio::test]
async fn test_detached_submit_with_tiny_queue() {
    let journal = Journal::new();
    let recorder = RecordingHandler::new("orders").with_journal(journal.clone());
    let config = DispatcherConfig::default()
        .with_queue_capacity(1)
        .with_submit_mode(SubmitMode::Detached);

    let mut dispatcher = EventDispatcher::new(config);
    dispatcher
        .register(EventType::OrderShipped, recorder.clone().into_dyn())
        .unwrap();
    dispatcher.start().await.unwrap();

    for event in test_events("s", EventType::OrderShipped, 10) {
        dispatcher.submit(event).await.unwrap();
    }
    let stats = within("stop", dispatcher.stop()).await.unwrap();

    assert_eq!(stats.dispatched, 10);
    assert_eq!(stats.completed, 10);
    assert_eq!(recorder.call_count(), 10);
    for i in 0..10 {
        let id = format!("s-{i}");
        assert!(journal.position("orders", &id, Phase::Finished).is_some());
    }
}

#[tokio::test]
async fn test_concurrent_producers() {
    let recorder = RecordingHandler::new("users");
    let mut dispatcher = EventDispatcher::new(DispatcherConfig::default().with_queue_capacity(4));
    dispatcher
        .register(EventType::UserCreated, recorder.clone().into_dyn())
        .unwrap();
    dispatcher.start().await.unwrap();

    let mut producers = Vec::new();
    for p in 0..4 {
        let submitter = dispatcher.submitter();
        producers.push(tokio::spawn(async move {
            for event in test_events(&format!("p{p}"), EventType::UserCreated, 25) {
                submitter.submit(event).await.unwrap();
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }

    let stats = dispatcher.stop().await.unwrap();
    assert_eq!(stats.dispatched, 100);
    assert_eq!(stats.processed, 100);

    // Each producer's own events keep their submission order.
    let ids = recorder.event_ids();
    for p in 0..4 {
        let prefix = format!("p{p}-");
        let own: Vec<&String> = ids.iter().filter(|id| id.starts_with(&prefix)).collect();
        let expected: Vec<String> = (0..25).map(|i| format!("{prefix}{i}")).collect();
        assert_eq!(own, expected.iter().collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_lifecycle_errors() {
    let mut dispatcher = EventDispatcher::default();
    let submitter = dispatcher.submitter();

    assert!(matches!(
        submitter.submit(test_event("early", EventType::UserCreated)).await,
        Err(DispatchError::InvalidState { .. })
    ));

    dispatcher.start().await.unwrap();
    assert!(dispatcher.start().await.is_err());
    assert!(
        dispatcher
            .register(EventType::UserCreated, RecordingHandler::new("late").into_dyn())
            .is_err()
    );

    dispatcher.stop().await.unwrap();
    assert!(matches!(
        submitter.submit(test_event("late", EventType::UserCreated)).await,
        Err(DispatchError::Closed)
    ));
    assert_eq!(dispatcher.stats().dispatched, 0);
}
