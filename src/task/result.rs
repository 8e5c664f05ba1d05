// src/task/result.rs

//! Execution results.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::task::TaskId;

/// Lifecycle status of a task within one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Registered but not yet started.
    Pending,
    /// First attempt in flight.
    Running,
    /// Terminal: the task produced a value.
    Success,
    /// Terminal: all attempts exhausted without success.
    Failed,
    /// Terminal: not executed because a dependency did not succeed.
    Skipped,
    /// A retry attempt in flight.
    Retrying,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskStatus::Success | TaskStatus::Failed | TaskStatus::Skipped
        )
    }
}

/// Terminal outcome of a task, as broadcast to its dependents.
///
/// This is the read-only view dependents gate on; the full lifecycle lives
/// in [`TaskStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalState {
    Success,
    Failed,
    Skipped,
}

/// Record of one task's execution across all of its attempts.
///
/// Created when the task starts (or is skipped), mutated across retries, and
/// frozen once a terminal status is reached.
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task_id: TaskId,
    pub status: TaskStatus,
    pub start_time: DateTime<Utc>,
    /// Unset until a terminal status is reached.
    pub end_time: Option<DateTime<Utc>>,
    /// Return value of the work closure; set on success only.
    pub result: Option<Value>,
    /// Description of the final failure or the skip reason.
    pub error: Option<String>,
    /// Zero-indexed attempt number at which the terminal outcome occurred.
    pub retry_count: u32,
}

impl TaskResult {
    /// Fresh result for a task whose first attempt is starting now.
    pub fn started(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: TaskStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            result: None,
            error: None,
            retry_count: 0,
        }
    }

    /// Terminal result for a task that was never started.
    pub fn skipped(task_id: TaskId, reason: String) -> Self {
        let now = Utc::now();
        Self {
            task_id,
            status: TaskStatus::Skipped,
            start_time: now,
            end_time: Some(now),
            result: None,
            error: Some(reason),
            retry_count: 0,
        }
    }

    pub(crate) fn finish_success(&mut self, value: Value) {
        self.status = TaskStatus::Success;
        self.result = Some(value);
        self.end_time = Some(Utc::now());
    }

    pub(crate) fn finish_failed(&mut self, error: String) {
        self.status = TaskStatus::Failed;
        self.error = Some(error);
        self.end_time = Some(Utc::now());
    }

    /// Wall-clock duration, available once terminal.
    pub fn duration(&self) -> Option<Duration> {
        self.end_time
            .map(|end| (end - self.start_time).to_std().unwrap_or_default())
    }

    /// Duration in seconds; 0.0 while not yet terminal.
    pub fn duration_secs(&self) -> f64 {
        self.duration().map(|d| d.as_secs_f64()).unwrap_or(0.0)
    }

    /// Terminal view of the status, if terminal.
    pub fn terminal_state(&self) -> Option<TerminalState> {
        match self.status {
            TaskStatus::Success => Some(TerminalState::Success),
            TaskStatus::Failed => Some(TerminalState::Failed),
            TaskStatus::Skipped => Some(TerminalState::Skipped),
            TaskStatus::Pending | TaskStatus::Running | TaskStatus::Retrying => None,
        }
    }
}
