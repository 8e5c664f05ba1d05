// tests/engine_retry.rs

//! Retry, backoff and timeout behaviour of the per-task executor.

use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde_json::json;

use predflow::engine::execute_with_retry;
use predflow::task::{Task, TaskStatus, TaskWork, WorkFuture};
use predflow_test_utils::{failing_work, flaky_work, init_tracing};

type TestResult = Result<(), Box<dyn Error>>;

/// Work that sleeps long enough to trip any small timeout.
fn slow_work(calls: Arc<AtomicUsize>) -> TaskWork {
    Arc::new(move || -> WorkFuture {
        calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(json!(null))
        })
    })
}

#[tokio::test]
async fn persistent_failure_exhausts_all_attempts() -> TestResult {
    init_tracing();

    let calls = Arc::new(AtomicUsize::new(0));
    let task = Task::builder("doomed", failing_work("connection refused", calls.clone()))
        .max_retries(3)
        .retry_delay(Duration::from_millis(5))
        .build();

    let result = execute_with_retry(&task).await;

    assert_eq!(result.status, TaskStatus::Failed);
    // max_retries = 3 means one initial attempt plus three retries.
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    assert_eq!(result.retry_count, 3);
    assert!(result.end_time.is_some());

    let error = result.error.unwrap_or_default();
    assert!(
        error.contains("connection refused"),
        "final error should carry the last failure reason: {error}"
    );
    Ok(())
}

#[tokio::test]
async fn success_short_circuits_remaining_retries() -> TestResult {
    init_tracing();

    let calls = Arc::new(AtomicUsize::new(0));
    let task = Task::builder("flaky", flaky_work(2, calls.clone()))
        .max_retries(2)
        .retry_delay(Duration::from_millis(10))
        .build();

    let result = execute_with_retry(&task).await;

    assert_eq!(result.status, TaskStatus::Success);
    assert_eq!(result.retry_count, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(result.result.is_some());
    assert!(result.error.is_none());
    Ok(())
}

#[tokio::test]
async fn first_attempt_success_never_retries() -> TestResult {
    init_tracing();

    let calls = Arc::new(AtomicUsize::new(0));
    let task = Task::builder("steady", flaky_work(0, calls.clone()))
        .max_retries(5)
        .retry_delay(Duration::from_millis(1))
        .build();

    let result = execute_with_retry(&task).await;

    assert_eq!(result.status, TaskStatus::Success);
    assert_eq!(result.retry_count, 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test]
async fn backoff_doubles_between_attempts() -> TestResult {
    init_tracing();

    let calls = Arc::new(AtomicUsize::new(0));
    let task = Task::builder("flaky", flaky_work(2, calls))
        .max_retries(2)
        .retry_delay(Duration::from_millis(50))
        .build();

    let started = Instant::now();
    let result = execute_with_retry(&task).await;
    let elapsed = started.elapsed();

    assert_eq!(result.status, TaskStatus::Success);
    // Two failed attempts sleep 50ms then 100ms before the third succeeds.
    assert!(
        elapsed >= Duration::from_millis(140),
        "expected at least ~150ms of backoff, got {elapsed:?}"
    );
    Ok(())
}

#[tokio::test]
async fn timeout_counts_as_a_failed_attempt() -> TestResult {
    init_tracing();

    let calls = Arc::new(AtomicUsize::new(0));
    let task = Task::builder("stuck", slow_work(calls.clone()))
        .max_retries(1)
        .retry_delay(Duration::from_millis(5))
        .timeout(Duration::from_millis(30))
        .build();

    let result = execute_with_retry(&task).await;

    assert_eq!(result.status, TaskStatus::Failed);
    // The timed-out attempt is retried like any other failure.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(result.retry_count, 1);

    let error = result.error.unwrap_or_default();
    assert!(
        error.contains("timeout"),
        "error should mention the timeout: {error}"
    );
    Ok(())
}

#[tokio::test]
async fn timeout_does_not_fire_for_fast_work() -> TestResult {
    init_tracing();

    let calls = Arc::new(AtomicUsize::new(0));
    let task = Task::builder("quick", flaky_work(0, calls.clone()))
        .max_retries(0)
        .timeout(Duration::from_secs(5))
        .build();

    let result = execute_with_retry(&task).await;

    assert_eq!(result.status, TaskStatus::Success);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}
