//! Shared helpers for integration tests.

use std::time::Duration;

use courier_events::{EventDispatcher, StatsSnapshot};

/// Upper bound on any single wait in these tests.
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// Poll until `completed` reaches `count`, returning the snapshot that did.
///
/// Panics after [`WAIT_LIMIT`].
#[allow(dead_code)]
pub async fn wait_for_completed(dispatcher: &EventDispatcher, count: u64) -> StatsSnapshot {
    tokio::time::timeout(WAIT_LIMIT, async {
        loop {
            let stats = dispatcher.stats();
            if stats.completed >= count {
                return stats;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("dispatcher did not complete events in time")
}

/// Run `future` under [`WAIT_LIMIT`], panicking with `what` on expiry.
#[allow(dead_code)]
pub async fn within<F: std::future::Future>(what: &str, future: F) -> F::Output {
    tokio::time::timeout(WAIT_LIMIT, future)
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {what}"))
}
