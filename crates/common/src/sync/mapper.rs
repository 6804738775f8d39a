//! Bounded-concurrency async map.
//!
//! `concurrency` workers pull items from one shared cursor, so at most that
//! many operations are in flight at once. All workers run on the calling
//! task (no spawning), and results come back in input order no matter which
//! worker finished first.
//!
//! Callers hitting a rate-limited API should keep `concurrency` at 1 unless
//! they also budget requests across workers.

use std::future::Future;

use futures::future::join_all;
use parking_lot::Mutex;

/// Apply `worker` to every item with at most `concurrency` in flight.
///
/// `worker` receives the item and its index in the input. A `concurrency` of
/// zero is treated as one.
pub async fn map_concurrent<I, T, R, F, Fut>(items: I, worker: F, concurrency: usize) -> Vec<R>
where
    I: IntoIterator<Item = T>,
    F: Fn(T, usize) -> Fut,
    Fut: Future<Output = R>,
{
    let cursor = Mutex::new(items.into_iter().enumerate());
    let cursor = &cursor;
    let worker = &worker;

    let lanes = (0..concurrency.max(1)).map(|_| async move {
        let mut produced = Vec::new();
        loop {
            let next = cursor.lock().next();
            let Some((index, item)) = next else {
                break;
            };
            produced.push((index, worker(item, index).await));
        }
        produced
    });

    let mut results: Vec<(usize, R)> = join_all(lanes).await.into_iter().flatten().collect();
    results.sort_unstable_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}
