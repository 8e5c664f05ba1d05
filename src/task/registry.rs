// src/task/registry.rs

//! Per-run task registry.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::task::{Task, TaskId};

/// The full set of tasks for one pipeline run, keyed by id.
///
/// Iteration follows insertion order; the topological sort uses that order
/// as its deterministic tie-break among tasks that become ready together.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: HashMap<TaskId, Task>,
    /// Insertion order of ids. Re-registering an id keeps its original slot.
    order: Vec<TaskId>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, replacing any previous definition with the same id.
    ///
    /// Dependency ids are not checked here; the graph is validated as a
    /// whole before execution.
    pub fn add(&mut self, task: Task) {
        if self.tasks.contains_key(&task.id) {
            warn!(
                task = %task.id,
                "re-registering task id; previous definition is replaced"
            );
        } else {
            self.order.push(task.id.clone());
        }

        debug!(
            task = %task.id,
            name = %task.name,
            deps = ?task.dependencies,
            "registered task"
        );
        self.tasks.insert(task.id.clone(), task);
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|id| id.as_str())
    }

    /// Tasks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.order.iter().filter_map(|id| self.tasks.get(id))
    }

    /// Hand a task over to the engine. The id stays in the insertion order
    /// so unrelated iteration stays stable.
    pub(crate) fn take(&mut self, id: &str) -> Option<Task> {
        self.tasks.remove(id)
    }
}
