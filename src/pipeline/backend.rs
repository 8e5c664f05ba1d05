// src/pipeline/backend.rs

//! Pluggable stage backend abstraction.
//!
//! The pipeline builder binds task bodies against a `StageBackend` instead
//! of concrete data-source/storage clients. This keeps the scheduler free of
//! domain plumbing and makes it easy to swap in a recording fake in tests.
//!
//! - [`SimulatedBackend`] is the implementation used by the demo binary; it
//!   sleeps briefly per stage and returns a plausible summary record.
//! - Production deployments implement the trait over their real market
//!   fetchers, cleaners and storage clients.

use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;
use tracing::debug;

use crate::task::WorkFuture;

/// Trait abstracting the domain collaborators invoked by pipeline tasks.
///
/// Every method is one stage body: it receives the identifiers the builder
/// bound at construction time and returns a boxed future resolving to a
/// JSON summary on success. Failure is signalled via `Err` only.
pub trait StageBackend: Send + Sync {
    /// Fetch raw market data for `symbol` from `source`.
    fn collect(&self, source: &str, symbol: &str, days_back: u32) -> WorkFuture;

    /// Clean previously collected raw data.
    fn clean(&self, source: &str, symbol: &str) -> WorkFuture;

    /// Persist cleaned data and verify the write.
    fn store(&self, source: &str, symbol: &str) -> WorkFuture;

    /// Build candle aggregates for one interval from stored data.
    fn aggregate(&self, symbol: &str, interval: &str, days_back: u32) -> WorkFuture;

    /// Run the strategy backtest over the symbol's aggregates.
    fn backtest(&self, symbol: &str) -> WorkFuture;

    /// Render charts from the backtest output.
    fn visualize(&self, symbol: &str) -> WorkFuture;
}

/// Backend that simulates each stage with a short sleep.
///
/// Used by the demo binary and smoke tests; the returned records carry the
/// same field names the real collaborators produce.
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    /// Simulated per-stage latency.
    pub latency: Duration,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(50),
        }
    }
}

impl StageBackend for SimulatedBackend {
    fn collect(&self, source: &str, symbol: &str, days_back: u32) -> WorkFuture {
        let (source, symbol) = (source.to_string(), symbol.to_string());
        let latency = self.latency;
        Box::pin(async move {
            debug!(%source, %symbol, days_back, "simulated collect");
            sleep(latency).await;
            Ok(json!({
                "source_type": source,
                "symbol": symbol,
                "record_count": days_back * 24,
            }))
        })
    }

    fn clean(&self, source: &str, symbol: &str) -> WorkFuture {
        let (source, symbol) = (source.to_string(), symbol.to_string());
        let latency = self.latency;
        Box::pin(async move {
            debug!(%source, %symbol, "simulated clean");
            sleep(latency).await;
            Ok(json!({
                "source_type": source,
                "symbol": symbol,
                "cleaned_count": 660,
            }))
        })
    }

    fn store(&self, source: &str, symbol: &str) -> WorkFuture {
        let (source, symbol) = (source.to_string(), symbol.to_string());
        let latency = self.latency;
        Box::pin(async move {
            debug!(%source, %symbol, "simulated store");
            sleep(latency).await;
            Ok(json!({
                "source_type": source,
                "symbol": symbol,
                "stored": true,
            }))
        })
    }

    fn aggregate(&self, symbol: &str, interval: &str, days_back: u32) -> WorkFuture {
        let (symbol, interval) = (symbol.to_string(), interval.to_string());
        let latency = self.latency;
        Box::pin(async move {
            debug!(%symbol, %interval, days_back, "simulated aggregate");
            sleep(latency).await;
            Ok(json!({
                "symbol": symbol,
                "interval": interval,
                "candle_count": days_back,
            }))
        })
    }

    fn backtest(&self, symbol: &str) -> WorkFuture {
        let symbol = symbol.to_string();
        let latency = self.latency;
        Box::pin(async move {
            debug!(%symbol, "simulated backtest");
            sleep(latency).await;
            Ok(json!({
                "symbol": symbol,
                "total_return": 0.042,
                "trades": 17,
            }))
        })
    }

    fn visualize(&self, symbol: &str) -> WorkFuture {
        let symbol = symbol.to_string();
        let latency = self.latency;
        Box::pin(async move {
            debug!(%symbol, "simulated visualize");
            sleep(latency).await;
            Ok(json!({
                "symbol": symbol,
                "charts": ["price", "equity_curve"],
            }))
        })
    }
}
