//! A stage backend that records which stage bodies were invoked.

use std::sync::{Arc, Mutex};

use serde_json::json;

use predflow::pipeline::StageBackend;
use predflow::task::WorkFuture;

/// Records every stage invocation as `"stage source symbol"`-style strings
/// and immediately succeeds. The invocation log lets tests assert which
/// bodies ran and in what order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    invocations: Arc<Mutex<Vec<String>>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the invocations so far.
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.lock().expect("invocation log poisoned").clone()
    }

    fn record(&self, entry: String) -> WorkFuture {
        let invocations = Arc::clone(&self.invocations);
        Box::pin(async move {
            invocations
                .lock()
                .expect("invocation log poisoned")
                .push(entry);
            Ok(json!({ "ok": true }))
        })
    }
}

impl StageBackend for RecordingBackend {
    fn collect(&self, source: &str, symbol: &str, days_back: u32) -> WorkFuture {
        self.record(format!("collect {source} {symbol} {days_back}"))
    }

    fn clean(&self, source: &str, symbol: &str) -> WorkFuture {
        self.record(format!("clean {source} {symbol}"))
    }

    fn store(&self, source: &str, symbol: &str) -> WorkFuture {
        self.record(format!("store {source} {symbol}"))
    }

    fn aggregate(&self, symbol: &str, interval: &str, days_back: u32) -> WorkFuture {
        self.record(format!("aggregate {symbol} {interval} {days_back}"))
    }

    fn backtest(&self, symbol: &str) -> WorkFuture {
        self.record(format!("backtest {symbol}"))
    }

    fn visualize(&self, symbol: &str) -> WorkFuture {
        self.record(format!("visualize {symbol}"))
    }
}
