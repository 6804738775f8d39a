//! Integration tests for bounded-concurrency mapping
//!
//! Tests the in-flight ceiling and ordering guarantees of `map_concurrent`.

#![cfg(feature = "runtime")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use lookupsync_common::sync::map_concurrent;
use parking_lot::Mutex;

/// Verifies that no more than `concurrency` workers are ever in flight.
///
/// # Test Steps
/// 1. Map 10 items with concurrency 3, each sleeping briefly
/// 2. Track current and peak in-flight counts
/// 3. Verify the peak equals the configured concurrency
#[tokio::test(start_paused = true)]
async fn test_in_flight_never_exceeds_limit() {
    let in_flight = AtomicUsize::new(0);
    let peak = AtomicUsize::new(0);

    let out = map_concurrent(
        0..10_u64,
        |item, _| {
            let in_flight = &in_flight;
            let peak = &peak;
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10 + item)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
                item
            }
        },
        3,
    )
    .await;

    assert_eq!(out, (0..10).collect::<Vec<_>>());
    assert_eq!(peak.load(Ordering::SeqCst), 3);
}

/// Validates that concurrency 1 processes items strictly one after another,
/// in input order.
#[tokio::test(start_paused = true)]
async fn test_single_worker_is_sequential() {
    let events = Mutex::new(Vec::new());

    map_concurrent(
        ["a", "b", "c"],
        |item, index| {
            let events = &events;
            async move {
                events.lock().push(format!("start {item}"));
                tokio::time::sleep(Duration::from_millis(5)).await;
                events.lock().push(format!("end {item}"));
                index
            }
        },
        1,
    )
    .await;

    assert_eq!(
        *events.lock(),
        vec!["start a", "end a", "start b", "end b", "start c", "end c"]
    );
}
