// tests/graph_ordering.rs

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use proptest::prelude::*;
use serde_json::json;

use predflow::errors::PipelineError;
use predflow::graph::{topological_order, validate_graph};
use predflow::task::{Task, TaskRegistry};
use predflow_test_utils::{init_tracing, ok_work};

fn simple_task(id: &str, deps: &[&str]) -> Task {
    Task::builder(id, ok_work(json!(null), Arc::new(AtomicUsize::new(0))))
        .dependencies(deps.iter().map(|d| d.to_string()).collect())
        .build()
}

fn position(order: &[String], id: &str) -> usize {
    order
        .iter()
        .position(|t| t == id)
        .unwrap_or_else(|| panic!("task '{id}' missing from order"))
}

#[test]
fn chain_orders_dependencies_first() {
    init_tracing();

    let mut registry = TaskRegistry::new();
    registry.add(simple_task("c", &["b"]));
    registry.add(simple_task("b", &["a"]));
    registry.add(simple_task("a", &[]));

    let order = topological_order(&registry).expect("acyclic graph must sort");

    assert_eq!(order.len(), 3);
    assert!(position(&order, "a") < position(&order, "b"));
    assert!(position(&order, "b") < position(&order, "c"));
}

#[test]
fn diamond_places_join_after_both_branches() {
    init_tracing();

    let mut registry = TaskRegistry::new();
    registry.add(simple_task("root", &[]));
    registry.add(simple_task("left", &["root"]));
    registry.add(simple_task("right", &["root"]));
    registry.add(simple_task("join", &["left", "right"]));

    let order = topological_order(&registry).expect("acyclic graph must sort");

    assert!(position(&order, "root") < position(&order, "left"));
    assert!(position(&order, "root") < position(&order, "right"));
    assert!(position(&order, "left") < position(&order, "join"));
    assert!(position(&order, "right") < position(&order, "join"));
}

#[test]
fn simultaneous_ready_tasks_keep_insertion_order() {
    init_tracing();

    let mut registry = TaskRegistry::new();
    registry.add(simple_task("x", &[]));
    registry.add(simple_task("y", &[]));
    registry.add(simple_task("z", &[]));

    let order = topological_order(&registry).expect("independent tasks must sort");

    assert_eq!(order, vec!["x".to_string(), "y".to_string(), "z".to_string()]);
}

#[test]
fn identical_registries_sort_identically() {
    init_tracing();

    let build = || {
        let mut registry = TaskRegistry::new();
        registry.add(simple_task("collect", &[]));
        registry.add(simple_task("clean", &["collect"]));
        registry.add(simple_task("store", &["clean"]));
        registry.add(simple_task("report", &["store", "clean"]));
        registry
    };

    let first = topological_order(&build()).expect("must sort");
    let second = topological_order(&build()).expect("must sort");

    assert_eq!(first, second);
}

#[test]
fn cycle_is_rejected_by_sort() {
    init_tracing();

    let mut registry = TaskRegistry::new();
    registry.add(simple_task("a", &["b"]));
    registry.add(simple_task("b", &["a"]));

    let err = topological_order(&registry).expect_err("cycle must not sort");
    assert!(matches!(err, PipelineError::GraphCycle(_)));
}

#[test]
fn cycle_is_rejected_by_validation() {
    init_tracing();

    let mut registry = TaskRegistry::new();
    registry.add(simple_task("a", &["c"]));
    registry.add(simple_task("b", &["a"]));
    registry.add(simple_task("c", &["b"]));

    let err = validate_graph(&registry).expect_err("cycle must fail validation");
    assert!(matches!(err, PipelineError::GraphCycle(_)));
}

#[test]
fn self_dependency_is_rejected_by_validation() {
    init_tracing();

    let mut registry = TaskRegistry::new();
    registry.add(simple_task("loner", &["loner"]));

    let err = validate_graph(&registry).expect_err("self-dependency must fail");
    assert!(matches!(err, PipelineError::GraphCycle(_)));
}

#[test]
fn unknown_dependency_is_rejected_by_validation() {
    init_tracing();

    let mut registry = TaskRegistry::new();
    registry.add(simple_task("b", &["ghost"]));

    match validate_graph(&registry) {
        Err(PipelineError::UnknownDependency { task, dep }) => {
            assert_eq!(task, "b");
            assert_eq!(dep, "ghost");
        }
        other => panic!("expected UnknownDependency, got {other:?}"),
    }
}

// Generate an acyclic registry by only allowing task N to depend on tasks
// with a lower index, mirroring how valid pipelines are layered.
proptest! {
    #[test]
    fn sorted_order_respects_every_edge(
        raw_deps in proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..6),
            1..12,
        )
    ) {
        let mut registry = TaskRegistry::new();
        let mut all_deps: Vec<Vec<String>> = Vec::new();

        for (i, potential) in raw_deps.iter().enumerate() {
            let mut deps: Vec<String> = potential
                .iter()
                .filter(|_| i > 0)
                .map(|raw| format!("task_{}", raw % i.max(1)))
                .collect();
            deps.sort();
            deps.dedup();

            let id = format!("task_{i}");
            registry.add(
                Task::builder(
                    id.as_str(),
                    ok_work(json!(null), Arc::new(AtomicUsize::new(0))),
                )
                .dependencies(deps.clone())
                .build(),
            );
            all_deps.push(deps);
        }

        let order = topological_order(&registry).expect("layered graph is acyclic");
        prop_assert_eq!(order.len(), raw_deps.len());

        for (i, deps) in all_deps.iter().enumerate() {
            let task_pos = position(&order, &format!("task_{i}"));
            for dep in deps {
                prop_assert!(position(&order, dep) < task_pos);
            }
        }
    }
}
