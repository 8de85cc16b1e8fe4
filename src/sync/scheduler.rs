//! Bounded-concurrency task runner
//!
//! [`BoundedScheduler`] drives a fixed batch of task thunks with at most
//! `concurrency` of them in flight, and returns results index-aligned with the
//! input. All tasks are polled on the calling task; nothing is spawned.

use futures::stream::{FuturesUnordered, StreamExt};
use std::future::Future;
use tracing::{debug, warn};

use crate::error::ValidationError;

/// Runs a batch of async tasks under a concurrency cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedScheduler {
    concurrency: usize,
}

impl BoundedScheduler {
    /// Create a scheduler; `concurrency` must be at least 1
    pub fn new(concurrency: usize) -> Result<Self, ValidationError> {
        if concurrency == 0 {
            return Err(ValidationError::ZeroConcurrency);
        }
        Ok(Self { concurrency })
    }

    /// Maximum number of tasks in flight
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run every task and collect results in input order
    ///
    /// Each thunk is only invoked once a slot is free. On the first failure no
    /// further tasks are admitted; tasks already started are driven to
    /// completion and their results discarded, then the first error is
    /// returned.
    pub async fn run<F, Fut, T, E>(&self, tasks: Vec<F>) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let total = tasks.len();
        let mut results: Vec<Option<T>> = std::iter::repeat_with(|| None).take(total).collect();
        let mut pending = tasks.into_iter().enumerate();
        let mut in_flight = FuturesUnordered::new();
        let mut first_error: Option<E> = None;

        debug!(
            tasks = total,
            concurrency = self.concurrency,
            "Starting bounded batch"
        );

        loop {
            while first_error.is_none() && in_flight.len() < self.concurrency {
                match pending.next() {
                    Some((index, task)) => {
                        in_flight.push(async move { (index, task().await) });
                    }
                    None => break,
                }
            }

            match in_flight.next().await {
                Some((index, Ok(value))) => results[index] = Some(value),
                Some((index, Err(err))) => {
                    if first_error.is_none() {
                        warn!(
                            task = index,
                            in_flight = in_flight.len(),
                            "Task failed, draining batch"
                        );
                        first_error = Some(err);
                    } else {
                        debug!(task = index, "Discarding error from draining task");
                    }
                }
                None => break,
            }
        }

        if let Some(err) = first_error {
            return Err(err);
        }

        let ordered: Vec<T> = results.into_iter().flatten().collect();
        debug_assert_eq!(ordered.len(), total);
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_zero_concurrency_rejected() {
        assert_eq!(
            BoundedScheduler::new(0),
            Err(ValidationError::ZeroConcurrency)
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let scheduler = BoundedScheduler::new(4).unwrap();
        let tasks: Vec<fn() -> std::future::Ready<Result<u32, String>>> = Vec::new();

        let results = scheduler.run(tasks).await.unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_results_follow_input_order() {
        let scheduler = BoundedScheduler::new(3).unwrap();

        // Later tasks finish first
        let tasks: Vec<_> = (0..10u64)
            .map(|i| {
                move || async move {
                    tokio::time::sleep(Duration::from_millis((10 - i) * 7 + (i % 3) * 5)).await;
                    Ok::<u64, String>(i * 10)
                }
            })
            .collect();

        let results = scheduler.run(tasks).await.unwrap();

        assert_eq!(results, (0..10u64).map(|i| i * 10).collect::<Vec<_>>());
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_never_exceeds_cap() {
        let scheduler = BoundedScheduler::new(4).unwrap();
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..25u64)
            .map(|i| {
                let active = active.clone();
                let peak = peak.clone();
                move || async move {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(1 + (i * 13) % 9)).await;
                    active.fetch_sub(1, Ordering::SeqCst);
                    Ok::<u64, String>(i)
                }
            })
            .collect();

        let results = scheduler.run(tasks).await.unwrap();

        assert_eq!(results.len(), 25);
        assert_eq!(peak.load(Ordering::SeqCst), 4);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_stops_admission_and_drains_started_tasks() {
        let scheduler = BoundedScheduler::new(2).unwrap();
        let started = Arc::new(AtomicUsize::new(0));
        let slow_finished = Arc::new(AtomicBool::new(false));

        let tasks: Vec<_> = (0..6usize)
            .map(|i| {
                let started = started.clone();
                let slow_finished = slow_finished.clone();
                move || async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    match i {
                        0 => {
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            slow_finished.store(true, Ordering::SeqCst);
                            Ok(i)
                        }
                        1 => Err(format!("task {} failed", i)),
                        _ => Ok(i),
                    }
                }
            })
            .collect();

        let result = scheduler.run(tasks).await;

        assert_eq!(result, Err("task 1 failed".to_string()));
        assert_eq!(started.load(Ordering::SeqCst), 2);
        assert!(slow_finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cap_larger_than_batch() {
        let scheduler = BoundedScheduler::new(100).unwrap();
        let tasks: Vec<_> = (0..3u8)
            .map(|i| move || async move { Ok::<u8, String>(i) })
            .collect();

        assert_eq!(scheduler.run(tasks).await.unwrap(), vec![0, 1, 2]);
    }
}
