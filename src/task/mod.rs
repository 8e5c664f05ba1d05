// src/task/mod.rs

//! Task model.
//!
//! - [`spec`] defines the immutable [`Task`] description and its builder.
//! - [`registry`] holds the tasks for one pipeline run, keyed by id.
//! - [`result`] records what happened when a task was executed.

pub mod registry;
pub mod result;
pub mod spec;

pub use registry::TaskRegistry;
pub use result::{TaskResult, TaskStatus, TerminalState};
pub use spec::{Task, TaskBuilder, TaskWork, WorkFuture};

/// Canonical task identifier type used throughout the crate.
pub type TaskId = String;
