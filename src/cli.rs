// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::pipeline::Stage;

/// Command-line arguments for `predflow`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "predflow",
    version,
    about = "Run the market-data pipeline DAG with bounded concurrency.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// When omitted, built-in defaults are used; the flags below override
    /// file values either way.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Asset symbols to process (comma-separated or repeated).
    #[arg(long, value_name = "SYMBOL", value_delimiter = ',')]
    pub symbols: Vec<String>,

    /// Market-data sources to collect from.
    #[arg(long = "sources", value_name = "SOURCE", value_delimiter = ',')]
    pub source_types: Vec<String>,

    /// Candle intervals to aggregate.
    #[arg(long, value_name = "INTERVAL", value_delimiter = ',')]
    pub intervals: Vec<String>,

    /// How many days of history to process.
    #[arg(long, value_name = "DAYS")]
    pub days_back: Option<u32>,

    /// Maximum number of tasks running at once.
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Build and run the pipeline only up to this stage.
    #[arg(long, value_enum, value_name = "STAGE")]
    pub stage: Option<Stage>,

    /// Print the task graph without executing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PREDFLOW_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
