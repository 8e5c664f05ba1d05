// src/engine/executor.rs

//! Bounded-concurrency execution of a task registry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::engine::retry::execute_with_retry;
use crate::errors::Result;
use crate::graph::{topological_order, validate_graph};
use crate::task::{Task, TaskId, TaskRegistry, TaskResult, TaskStatus, TerminalState};

/// Results of one pipeline run, keyed by task id.
pub type PipelineResults = HashMap<TaskId, TaskResult>;

type TerminalTx = watch::Sender<Option<TerminalState>>;
type TerminalRx = watch::Receiver<Option<TerminalState>>;

/// Executes one task registry under a global concurrency cap.
///
/// An engine owns its registry for exactly one run: [`ExecutionEngine::execute`]
/// consumes the engine, so per-run state cannot leak between runs and
/// several pipelines can run concurrently in the same process.
#[derive(Debug)]
pub struct ExecutionEngine {
    registry: TaskRegistry,
}

impl ExecutionEngine {
    pub fn new(registry: TaskRegistry) -> Self {
        Self { registry }
    }

    /// Execute every task, returning one result per task id.
    ///
    /// Fails only for configuration errors (unknown dependency, cycle),
    /// detected before any task starts. Individual task failures never
    /// abort the run; they are visible solely in the returned results, and
    /// dependents of a failed or skipped task are skipped individually.
    ///
    /// The semaphore bounds how many tasks have an attempt in flight at any
    /// instant. Launch follows the topological order, but a task's actual
    /// start is gated by its dependencies' terminal states, not by launch
    /// order: each task waits on its dependencies' terminal broadcasts
    /// before checking them, and only then takes a permit.
    pub async fn execute(mut self, max_concurrency: usize) -> Result<PipelineResults> {
        validate_graph(&self.registry)?;
        let order = topological_order(&self.registry)?;

        info!(
            tasks = order.len(),
            max_concurrency, "starting pipeline execution"
        );

        let permits = Arc::new(Semaphore::new(max_concurrency.max(1)));

        // One terminal-state broadcast per task. Dependents wait on these
        // instead of relying on launch order.
        let mut terminal_txs: HashMap<TaskId, TerminalTx> = HashMap::new();
        let mut terminal_rxs: HashMap<TaskId, TerminalRx> = HashMap::new();
        for id in &order {
            let (tx, rx) = watch::channel(None);
            terminal_txs.insert(id.clone(), tx);
            terminal_rxs.insert(id.clone(), rx);
        }

        let mut tasks: JoinSet<(TaskId, TaskResult)> = JoinSet::new();

        for id in &order {
            let Some(task) = self.registry.take(id) else {
                continue;
            };
            let Some(done_tx) = terminal_txs.remove(id) else {
                continue;
            };
            let deps: Vec<(TaskId, TerminalRx)> = task
                .dependencies
                .iter()
                .filter_map(|dep| terminal_rxs.get(dep).map(|rx| (dep.clone(), rx.clone())))
                .collect();

            tasks.spawn(run_task(task, deps, done_tx, Arc::clone(&permits)));
        }

        let mut results: PipelineResults = HashMap::with_capacity(order.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((id, result)) => {
                    results.insert(id, result);
                }
                Err(err) => {
                    // A panicking work closure surfaces here; its dependents
                    // see a dropped terminal sender and skip themselves.
                    error!(error = %err, "task future aborted");
                }
            }
        }

        let successful = count_status(&results, TaskStatus::Success);
        let failed = count_status(&results, TaskStatus::Failed);
        let skipped = count_status(&results, TaskStatus::Skipped);
        info!(successful, failed, skipped, "pipeline execution finished");

        Ok(results)
    }
}

fn count_status(results: &PipelineResults, status: TaskStatus) -> usize {
    results.values().filter(|r| r.status == status).count()
}

/// Drive one task: wait for dependency terminals, gate on their outcome,
/// then run with retry under a concurrency permit.
///
/// The dependency wait happens before permit acquisition so that a blocked
/// task never occupies a concurrency slot.
async fn run_task(
    task: Task,
    deps: Vec<(TaskId, TerminalRx)>,
    done_tx: TerminalTx,
    permits: Arc<Semaphore>,
) -> (TaskId, TaskResult) {
    let mut blocking: Vec<TaskId> = Vec::new();
    for (dep_id, rx) in deps {
        match await_terminal(rx).await {
            Some(TerminalState::Success) => {}
            Some(TerminalState::Failed) | Some(TerminalState::Skipped) | None => {
                blocking.push(dep_id);
            }
        }
    }

    if !blocking.is_empty() {
        debug!(
            task = %task.id,
            blocked_on = ?blocking,
            "skipping task; dependencies did not succeed"
        );
        let result = TaskResult::skipped(
            task.id.clone(),
            format!("dependencies did not succeed: {}", blocking.join(", ")),
        );
        let _ = done_tx.send(Some(TerminalState::Skipped));
        return (task.id, result);
    }

    let result = match permits.acquire_owned().await {
        Ok(_permit) => execute_with_retry(&task).await,
        // The semaphore is never closed while a run is in progress; treat a
        // closed limiter like an unmet precondition rather than panicking.
        Err(_closed) => TaskResult::skipped(task.id.clone(), "concurrency limiter closed".into()),
    };

    let _ = done_tx.send(Some(
        result.terminal_state().unwrap_or(TerminalState::Failed),
    ));
    (task.id, result)
}

/// Wait until a dependency broadcasts a terminal state.
///
/// Returns `None` if the sender was dropped before publishing one (the
/// dependency's future aborted); callers treat that as not-succeeded.
async fn await_terminal(mut rx: TerminalRx) -> Option<TerminalState> {
    loop {
        if let Some(state) = *rx.borrow() {
            return Some(state);
        }
        if rx.changed().await.is_err() {
            return *rx.borrow();
        }
    }
}
