// src/pipeline/builder.rs

//! Expand a pipeline spec into a concrete task graph.

use std::sync::Arc;

use tracing::info;

use crate::config::PipelineSpec;
use crate::pipeline::backend::StageBackend;
use crate::pipeline::stage::Stage;
use crate::task::{Task, TaskId, TaskRegistry};

/// Build the full six-stage pipeline for the given spec.
///
/// Task ids follow the `stage_source_symbol` / `stage_symbol_interval`
/// scheme; the stage name is always the first underscore-delimited token,
/// which is what the status report groups by.
pub fn build_pipeline(spec: &PipelineSpec, backend: Arc<dyn StageBackend>) -> TaskRegistry {
    build_pipeline_until(spec, backend, Stage::Visualize)
}

/// Build only the stage families up to and including `last_stage`.
///
/// Used for partial runs (`--stage store` stops after the storage family).
/// The dependency wiring within the built prefix is identical to the full
/// pipeline:
///
/// - `collect_{source}_{symbol}`: roots.
/// - `clean_{source}_{symbol}`: after its collect task; critical.
/// - `store_{source}_{symbol}`: after its clean task; critical.
/// - `aggregate_{symbol}_{interval}`: after **every** store task for the
///   symbol, across all sources.
/// - `backtest_{symbol}`: after every aggregate task for the symbol,
///   across all intervals.
/// - `visualize_{symbol}`: after the symbol's backtest.
pub fn build_pipeline_until(
    spec: &PipelineSpec,
    backend: Arc<dyn StageBackend>,
    last_stage: Stage,
) -> TaskRegistry {
    let mut registry = TaskRegistry::new();

    for source in &spec.source_types {
        for symbol in &spec.symbols {
            let id = collect_id(source, symbol);
            let work = {
                let backend = Arc::clone(&backend);
                let (source, symbol) = (source.clone(), symbol.clone());
                let days_back = spec.days_back;
                Arc::new(move || backend.collect(&source, &symbol, days_back))
            };
            registry.add(
                Task::builder(&id, work)
                    .name(format!("collect {source} {symbol} data"))
                    .build(),
            );
        }
    }

    if last_stage >= Stage::Clean {
        for source in &spec.source_types {
            for symbol in &spec.symbols {
                let id = format!("clean_{source}_{symbol}");
                let work = {
                    let backend = Arc::clone(&backend);
                    let (source, symbol) = (source.clone(), symbol.clone());
                    Arc::new(move || backend.clean(&source, &symbol))
                };
                registry.add(
                    Task::builder(&id, work)
                        .name(format!("clean {source} {symbol} data"))
                        .depends_on(collect_id(source, symbol))
                        .critical(true)
                        .build(),
                );
            }
        }
    }

    if last_stage >= Stage::Store {
        for source in &spec.source_types {
            for symbol in &spec.symbols {
                let id = store_id(source, symbol);
                let work = {
                    let backend = Arc::clone(&backend);
                    let (source, symbol) = (source.clone(), symbol.clone());
                    Arc::new(move || backend.store(&source, &symbol))
                };
                registry.add(
                    Task::builder(&id, work)
                        .name(format!("store {source} {symbol} data"))
                        .depends_on(format!("clean_{source}_{symbol}"))
                        .critical(true)
                        .build(),
                );
            }
        }
    }

    if last_stage >= Stage::Aggregate {
        for symbol in &spec.symbols {
            // Fan-in: each interval's aggregate waits for every source's
            // store task for this symbol.
            let store_tasks: Vec<TaskId> = spec
                .source_types
                .iter()
                .map(|source| store_id(source, symbol))
                .collect();

            for interval in &spec.intervals {
                let id = aggregate_id(symbol, interval);
                let work = {
                    let backend = Arc::clone(&backend);
                    let (symbol, interval) = (symbol.clone(), interval.clone());
                    let days_back = spec.days_back;
                    Arc::new(move || backend.aggregate(&symbol, &interval, days_back))
                };
                registry.add(
                    Task::builder(&id, work)
                        .name(format!("aggregate {symbol} {interval} candles"))
                        .dependencies(store_tasks.clone())
                        .build(),
                );
            }
        }
    }

    if last_stage >= Stage::Backtest {
        for symbol in &spec.symbols {
            let aggregate_tasks: Vec<TaskId> = spec
                .intervals
                .iter()
                .map(|interval| aggregate_id(symbol, interval))
                .collect();

            let id = backtest_id(symbol);
            let work = {
                let backend = Arc::clone(&backend);
                let symbol = symbol.clone();
                Arc::new(move || backend.backtest(&symbol))
            };
            registry.add(
                Task::builder(&id, work)
                    .name(format!("backtest {symbol} strategy"))
                    .dependencies(aggregate_tasks)
                    .build(),
            );
        }
    }

    if last_stage >= Stage::Visualize {
        for symbol in &spec.symbols {
            let id = format!("visualize_{symbol}");
            let work = {
                let backend = Arc::clone(&backend);
                let symbol = symbol.clone();
                Arc::new(move || backend.visualize(&symbol))
            };
            registry.add(
                Task::builder(&id, work)
                    .name(format!("visualize {symbol} results"))
                    .depends_on(backtest_id(symbol))
                    .build(),
            );
        }
    }

    info!(
        tasks = registry.len(),
        last_stage = %last_stage,
        "pipeline built"
    );
    registry
}

fn collect_id(source: &str, symbol: &str) -> TaskId {
    format!("collect_{source}_{symbol}")
}

fn store_id(source: &str, symbol: &str) -> TaskId {
    format!("store_{source}_{symbol}")
}

fn aggregate_id(symbol: &str, interval: &str) -> TaskId {
    format!("aggregate_{symbol}_{interval}")
}

fn backtest_id(symbol: &str) -> TaskId {
    format!("backtest_{symbol}")
}
