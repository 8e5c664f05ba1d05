// src/task/spec.rs

//! Immutable task descriptions.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::task::TaskId;

/// Boxed future produced by a task's work closure.
///
/// A task body signals failure exclusively by returning `Err`; the value on
/// success is an arbitrary JSON-like record handed to downstream consumers
/// through [`crate::task::TaskResult`].
pub type WorkFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

/// Zero-argument asynchronous command invoked by the engine.
///
/// All inputs are captured at task-construction time. The engine invokes the
/// closure once per attempt, so it must be callable repeatedly.
pub type TaskWork = Arc<dyn Fn() -> WorkFuture + Send + Sync>;

/// One named unit of asynchronous work with declared dependencies and retry
/// policy. Immutable after construction.
#[derive(Clone)]
pub struct Task {
    /// Unique id; the key in the [`crate::task::TaskRegistry`].
    pub id: TaskId,
    /// Human-readable label, display-only.
    pub name: String,
    /// The command to invoke, one call per attempt.
    pub work: TaskWork,
    /// Ids of tasks that must succeed before this one may start.
    pub dependencies: Vec<TaskId>,
    /// Retry attempts after the first failure.
    pub max_retries: u32,
    /// Base backoff delay; doubled after each failed attempt.
    pub retry_delay: Duration,
    /// Upper bound for a single attempt, if set.
    pub timeout: Option<Duration>,
    /// A failed critical task is logged at error level. It does not change
    /// scheduling; dependents are skipped through normal dependency gating.
    pub critical: bool,
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("dependencies", &self.dependencies)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("timeout", &self.timeout)
            .field("critical", &self.critical)
            .finish_non_exhaustive()
    }
}

impl Task {
    /// Start building a task with the given id and work closure.
    pub fn builder(id: impl Into<TaskId>, work: TaskWork) -> TaskBuilder {
        TaskBuilder::new(id, work)
    }
}

/// Builder for [`Task`].
///
/// Defaults: `name` = id, no dependencies, `max_retries` = 3,
/// `retry_delay` = 1s, no timeout, not critical.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: impl Into<TaskId>, work: TaskWork) -> Self {
        let id = id.into();
        Self {
            task: Task {
                name: id.clone(),
                id,
                work,
                dependencies: Vec::new(),
                max_retries: 3,
                retry_delay: Duration::from_secs(1),
                timeout: None,
                critical: false,
            },
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.task.name = name.into();
        self
    }

    /// Add a single dependency id.
    pub fn depends_on(mut self, dep: impl Into<TaskId>) -> Self {
        self.task.dependencies.push(dep.into());
        self
    }

    /// Replace the dependency list wholesale.
    pub fn dependencies(mut self, deps: Vec<TaskId>) -> Self {
        self.task.dependencies = deps;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.task.max_retries = retries;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.task.retry_delay = delay;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.task.timeout = Some(timeout);
        self
    }

    pub fn critical(mut self, critical: bool) -> Self {
        self.task.critical = critical;
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
