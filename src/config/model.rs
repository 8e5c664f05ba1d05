// src/config/model.rs

//! Configuration model for a pipeline run.

use serde::Deserialize;

/// Raw configuration as deserialized from TOML, before validation.
///
/// All fields default to the values a bare `predflow` run uses, so an empty
/// file (or no file at all) is a valid starting point that CLI flags can
/// override.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPipelineSpec {
    /// Asset symbols to process, e.g. `BTC_PRICE`.
    #[serde(default = "default_symbols")]
    pub symbols: Vec<String>,

    /// Market-data sources to collect from, e.g. `predict`, `polymarket`.
    #[serde(default = "default_source_types")]
    pub source_types: Vec<String>,

    /// Candle intervals to aggregate, e.g. `1h`, `1d`.
    #[serde(default = "default_intervals")]
    pub intervals: Vec<String>,

    /// How many days of history the collect/aggregate stages cover.
    #[serde(default = "default_days_back")]
    pub days_back: u32,

    /// Maximum number of tasks with an attempt in flight at once.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
}

impl Default for RawPipelineSpec {
    fn default() -> Self {
        Self {
            symbols: default_symbols(),
            source_types: default_source_types(),
            intervals: default_intervals(),
            days_back: default_days_back(),
            max_concurrency: default_max_concurrency(),
        }
    }
}

fn default_symbols() -> Vec<String> {
    vec!["BTC_PRICE".to_string()]
}

fn default_source_types() -> Vec<String> {
    vec!["predict".to_string()]
}

fn default_intervals() -> Vec<String> {
    vec!["1h".to_string()]
}

fn default_days_back() -> u32 {
    30
}

fn default_max_concurrency() -> usize {
    3
}

/// Validated pipeline configuration.
///
/// Construct via `PipelineSpec::try_from(raw)`; see
/// [`crate::config::validate`].
#[derive(Debug, Clone)]
pub struct PipelineSpec {
    pub symbols: Vec<String>,
    pub source_types: Vec<String>,
    pub intervals: Vec<String>,
    pub days_back: u32,
    pub max_concurrency: usize,
}

impl PipelineSpec {
    /// Build without validation; used by `TryFrom` after checks pass.
    pub(crate) fn new_unchecked(raw: RawPipelineSpec) -> Self {
        Self {
            symbols: raw.symbols,
            source_types: raw.source_types,
            intervals: raw.intervals,
            days_back: raw.days_back,
            max_concurrency: raw.max_concurrency,
        }
    }
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self::new_unchecked(RawPipelineSpec::default())
    }
}
