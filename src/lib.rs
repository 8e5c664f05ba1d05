// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod graph;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod task;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{PipelineSpec, RawPipelineSpec, load_from_path};
use crate::engine::ExecutionEngine;
use crate::pipeline::{SimulatedBackend, Stage, build_pipeline_until};
use crate::report::PipelineReport;
use crate::task::TaskRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (file + flag overrides)
/// - the pipeline builder
/// - the execution engine
/// - the status report
///
/// Returns the process exit code: the engine itself treats per-task
/// failures as data, so it is this layer that maps "any task failed or was
/// skipped" to a non-zero exit.
pub async fn run(args: CliArgs) -> Result<i32> {
    let spec = resolve_spec(&args)?;
    let last_stage = args.stage.unwrap_or(Stage::Visualize);

    let backend = Arc::new(SimulatedBackend::default());
    let registry = build_pipeline_until(&spec, backend, last_stage);

    if args.dry_run {
        print_dry_run(&registry, &spec);
        return Ok(0);
    }

    info!(
        symbols = ?spec.symbols,
        sources = ?spec.source_types,
        intervals = ?spec.intervals,
        %last_stage,
        "starting pipeline run"
    );

    let started = Instant::now();
    let results = ExecutionEngine::new(registry)
        .execute(spec.max_concurrency)
        .await?;
    let report = PipelineReport::from_results(&results, started.elapsed());

    println!("{}", report.render());

    let exit_code = if report.failed_tasks + report.skipped_tasks > 0 {
        1
    } else {
        0
    };
    Ok(exit_code)
}

/// Merge the optional config file with CLI overrides and validate.
fn resolve_spec(args: &CliArgs) -> errors::Result<PipelineSpec> {
    let mut raw = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawPipelineSpec::default(),
    };

    if !args.symbols.is_empty() {
        raw.symbols = args.symbols.clone();
    }
    if !args.source_types.is_empty() {
        raw.source_types = args.source_types.clone();
    }
    if !args.intervals.is_empty() {
        raw.intervals = args.intervals.clone();
    }
    if let Some(days_back) = args.days_back {
        raw.days_back = days_back;
    }
    if let Some(concurrency) = args.concurrency {
        raw.max_concurrency = concurrency;
    }

    PipelineSpec::try_from(raw)
}

/// Simple dry-run output: print tasks, dependencies and policies.
fn print_dry_run(registry: &TaskRegistry, spec: &PipelineSpec) {
    println!("predflow dry-run");
    println!("  symbols:         {:?}", spec.symbols);
    println!("  source_types:    {:?}", spec.source_types);
    println!("  intervals:       {:?}", spec.intervals);
    println!("  days_back:       {}", spec.days_back);
    println!("  max_concurrency: {}", spec.max_concurrency);
    println!();

    println!("tasks ({}):", registry.len());
    for task in registry.iter() {
        println!("  - {}", task.id);
        println!("      name: {}", task.name);
        if !task.dependencies.is_empty() {
            println!("      depends_on: {:?}", task.dependencies);
        }
        println!("      max_retries: {}", task.max_retries);
        if let Some(timeout) = task.timeout {
            println!("      timeout: {:.1}s", timeout.as_secs_f64());
        }
        if task.critical {
            println!("      critical: true");
        }
    }
}
