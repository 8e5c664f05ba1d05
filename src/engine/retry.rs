// src/engine/retry.rs

//! Per-task retry execution.

use serde_json::Value;
use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::task::{Task, TaskResult, TaskStatus};

/// Outcome of a single work invocation.
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(Value),
    Failure(String),
    TimedOut,
}

/// Run one attempt of the task's work, bounded by its timeout if set.
async fn run_attempt(task: &Task) -> AttemptOutcome {
    let fut = (task.work)();

    let outcome = match task.timeout {
        Some(limit) => match timeout(limit, fut).await {
            Ok(res) => res,
            Err(_elapsed) => return AttemptOutcome::TimedOut,
        },
        None => fut.await,
    };

    match outcome {
        Ok(value) => AttemptOutcome::Success(value),
        Err(err) => AttemptOutcome::Failure(format!("{err:#}")),
    }
}

/// Execute a task's work up to `max_retries + 1` times with exponential
/// backoff, producing the task's final [`TaskResult`].
///
/// The backoff before attempt k+1 is `retry_delay * 2^k`. `retry_count` in
/// the returned result is the zero-indexed attempt at which the terminal
/// outcome occurred.
pub async fn execute_with_retry(task: &Task) -> TaskResult {
    let mut result = TaskResult::started(task.id.clone());
    let mut delay = task.retry_delay;
    let mut attempt: u32 = 0;

    loop {
        result.retry_count = attempt;
        result.status = if attempt == 0 {
            TaskStatus::Running
        } else {
            TaskStatus::Retrying
        };

        let reason = match run_attempt(task).await {
            AttemptOutcome::Success(value) => {
                result.finish_success(value);
                info!(
                    task = %task.id,
                    attempts = attempt + 1,
                    duration_secs = result.duration_secs(),
                    "task succeeded"
                );
                return result;
            }
            AttemptOutcome::Failure(msg) => msg,
            AttemptOutcome::TimedOut => match task.timeout {
                Some(limit) => format!("attempt exceeded timeout of {:.1}s", limit.as_secs_f64()),
                None => "attempt timed out".to_string(),
            },
        };

        if attempt < task.max_retries {
            warn!(
                task = %task.id,
                attempt = attempt + 1,
                retry_in = ?delay,
                reason = %reason,
                "task attempt failed; retrying"
            );
            sleep(delay).await;
            delay *= 2;
            attempt += 1;
        } else {
            result.finish_failed(format!(
                "task '{}' failed on attempt {}: {}",
                task.name,
                attempt + 1,
                reason
            ));
            if task.critical {
                error!(
                    task = %task.id,
                    critical = true,
                    attempts = attempt + 1,
                    "critical task failed; downstream tasks will be skipped"
                );
            } else {
                warn!(
                    task = %task.id,
                    attempts = attempt + 1,
                    "task failed after exhausting retries"
                );
            }
            return result;
        }
    }
}
