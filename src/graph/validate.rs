// src/graph/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::{PipelineError, Result};
use crate::task::TaskRegistry;

/// Validate the registry before execution.
///
/// - every declared dependency must reference a registered task id,
/// - no task may depend on itself,
/// - the dependency graph must be acyclic.
pub fn validate_graph(registry: &TaskRegistry) -> Result<()> {
    for task in registry.iter() {
        for dep in &task.dependencies {
            if !registry.contains(dep) {
                return Err(PipelineError::UnknownDependency {
                    task: task.id.clone(),
                    dep: dep.clone(),
                });
            }
            if dep == &task.id {
                return Err(PipelineError::GraphCycle(format!(
                    "task '{}' depends on itself",
                    task.id
                )));
            }
        }
    }

    // Edge direction: dep -> task.
    // For a task T with `dependencies = ["D"]` we add edge D -> T.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for task in registry.iter() {
        graph.add_node(task.id.as_str());
    }

    for task in registry.iter() {
        for dep in &task.dependencies {
            graph.add_edge(dep.as_str(), task.id.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(PipelineError::GraphCycle(format!(
                "cycle detected in task graph involving task '{}'",
                node
            )))
        }
    }
}
