// src/graph/topo.rs

//! Topological execution order via Kahn's algorithm.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::errors::{PipelineError, Result};
use crate::task::{TaskId, TaskRegistry};

/// Compute a linear execution order consistent with all dependency edges.
///
/// Tasks that become ready at the same time are emitted in registry
/// insertion order, so identical registries always produce identical
/// orders.
///
/// Fails with [`PipelineError::GraphCycle`] when not every task can be
/// placed, i.e. the graph contains a cycle. Unknown dependency ids should be
/// caught by [`crate::graph::validate_graph`] first; here they simply leave
/// their dependents unplaced and surface as a cycle error.
pub fn topological_order(registry: &TaskRegistry) -> Result<Vec<TaskId>> {
    // Distinct count: a dependency listed twice still only gets completed
    // once, and the unblock scan below decrements once per completed dep.
    let mut in_degree: HashMap<&str, usize> = registry
        .iter()
        .map(|task| {
            let distinct: HashSet<&str> =
                task.dependencies.iter().map(|dep| dep.as_str()).collect();
            (task.id.as_str(), distinct.len())
        })
        .collect();

    let mut ready: VecDeque<&str> = registry
        .iter()
        .filter(|task| task.dependencies.is_empty())
        .map(|task| task.id.as_str())
        .collect();

    let mut order: Vec<TaskId> = Vec::with_capacity(registry.len());

    while let Some(current) = ready.pop_front() {
        order.push(current.to_string());

        // Unblock every task that lists `current` as a dependency. The scan
        // walks the registry in insertion order, which is what keeps the
        // tie-break deterministic.
        for task in registry.iter() {
            if !task.dependencies.iter().any(|dep| dep == current) {
                continue;
            }
            if let Some(degree) = in_degree.get_mut(task.id.as_str()) {
                *degree = degree.saturating_sub(1);
                if *degree == 0 {
                    ready.push_back(task.id.as_str());
                }
            }
        }
    }

    if order.len() != registry.len() {
        let stuck = registry
            .ids()
            .find(|id| !order.iter().any(|placed| placed == id))
            .unwrap_or("<unknown>");
        return Err(PipelineError::GraphCycle(format!(
            "unable to order all tasks ({} of {} placed; '{}' still blocked)",
            order.len(),
            registry.len(),
            stuck
        )));
    }

    Ok(order)
}
