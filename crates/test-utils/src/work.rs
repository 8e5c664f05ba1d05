#![allow(dead_code)]

//! Reusable work closures for scheduler tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use serde_json::{Value, json};

use predflow::task::{TaskWork, WorkFuture};

/// Work closure that always succeeds with the given value, counting calls.
pub fn ok_work(value: Value, calls: Arc<AtomicUsize>) -> TaskWork {
    Arc::new(move || -> WorkFuture {
        calls.fetch_add(1, Ordering::SeqCst);
        let value = value.clone();
        Box::pin(async move { Ok(value) })
    })
}

/// Work closure that always fails with the given message, counting calls.
pub fn failing_work(message: &str, calls: Arc<AtomicUsize>) -> TaskWork {
    let message = message.to_string();
    Arc::new(move || -> WorkFuture {
        calls.fetch_add(1, Ordering::SeqCst);
        let message = message.clone();
        Box::pin(async move { Err(anyhow!("{message}")) })
    })
}

/// Work closure that fails the first `failures` calls, then succeeds.
pub fn flaky_work(failures: usize, calls: Arc<AtomicUsize>) -> TaskWork {
    Arc::new(move || -> WorkFuture {
        let call = calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if call < failures {
                Err(anyhow!("transient failure on call {call}"))
            } else {
                Ok(json!({ "call": call }))
            }
        })
    })
}

/// Tracks how many work bodies are in flight at once, and the maximum ever
/// observed. Used to assert the engine's concurrency bound.
#[derive(Debug, Default)]
pub struct InFlightGauge {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl InFlightGauge {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    /// Highest number of bodies that were ever in flight together.
    pub fn observed_max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

/// Work closure that sleeps for `duration` while registered in the gauge.
pub fn tracked_sleep_work(duration: Duration, gauge: Arc<InFlightGauge>) -> TaskWork {
    Arc::new(move || -> WorkFuture {
        let gauge = Arc::clone(&gauge);
        Box::pin(async move {
            gauge.enter();
            tokio::time::sleep(duration).await;
            gauge.exit();
            Ok(json!({ "slept_ms": duration.as_millis() as u64 }))
        })
    })
}
