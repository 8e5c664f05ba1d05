// src/report/mod.rs

//! Post-run status reporting.
//!
//! A [`PipelineReport`] is a pure aggregation over a completed results map;
//! it performs no IO itself. The CLI prints [`PipelineReport::render`] and
//! decides the process exit code from the counts.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::time::Duration;

use crate::engine::PipelineResults;
use crate::task::{TaskId, TaskStatus};

/// How many slow tasks the report singles out.
const SLOWEST_TASKS_SHOWN: usize = 5;

/// Per-stage counts, keyed by the stage prefix of the task id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

/// Summary statistics for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub total_tasks: usize,
    pub successful_tasks: usize,
    pub failed_tasks: usize,
    pub skipped_tasks: usize,
    /// `successful / total`; 0.0 for an empty run.
    pub success_rate: f64,
    /// Wall-clock duration of the run in seconds.
    pub execution_time: f64,
    /// `total / execution_time`; 0.0 when the run took no measurable time.
    pub tasks_per_second: f64,
    /// Breakdown keyed by the first underscore-delimited token of each task
    /// id (`collect`, `clean`, ...). Sorted for stable rendering.
    pub stage_stats: BTreeMap<String, StageStats>,
    /// Failed task ids with their error messages, sorted by id.
    pub failures: Vec<(TaskId, String)>,
    /// Slowest tasks with durations in seconds, longest first.
    pub slowest_tasks: Vec<(TaskId, f64)>,
}

impl PipelineReport {
    /// Aggregate a completed results map.
    ///
    /// `wall_clock` is the caller-measured duration of the whole run; the
    /// per-task durations in the map overlap under concurrency, so they are
    /// not summed here.
    pub fn from_results(results: &PipelineResults, wall_clock: Duration) -> Self {
        let total_tasks = results.len();
        let successful_tasks = count(results, TaskStatus::Success);
        let failed_tasks = count(results, TaskStatus::Failed);
        let skipped_tasks = count(results, TaskStatus::Skipped);

        let success_rate = if total_tasks > 0 {
            successful_tasks as f64 / total_tasks as f64
        } else {
            0.0
        };

        let execution_time = wall_clock.as_secs_f64();
        let tasks_per_second = if execution_time > 0.0 {
            total_tasks as f64 / execution_time
        } else {
            0.0
        };

        let mut stage_stats: BTreeMap<String, StageStats> = BTreeMap::new();
        for (task_id, result) in results {
            let stage = task_id.split('_').next().unwrap_or(task_id).to_string();
            let entry = stage_stats.entry(stage).or_default();
            entry.total += 1;
            match result.status {
                TaskStatus::Success => entry.success += 1,
                TaskStatus::Failed => entry.failed += 1,
                _ => {}
            }
        }

        let mut failures: Vec<(TaskId, String)> = results
            .iter()
            .filter(|(_, r)| r.status == TaskStatus::Failed)
            .map(|(id, r)| (id.clone(), r.error.clone().unwrap_or_default()))
            .collect();
        failures.sort_by(|a, b| a.0.cmp(&b.0));

        let mut slowest_tasks: Vec<(TaskId, f64)> = results
            .iter()
            .filter(|(_, r)| r.end_time.is_some())
            .map(|(id, r)| (id.clone(), r.duration_secs()))
            .collect();
        slowest_tasks
            .sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        slowest_tasks.truncate(SLOWEST_TASKS_SHOWN);

        Self {
            total_tasks,
            successful_tasks,
            failed_tasks,
            skipped_tasks,
            success_rate,
            execution_time,
            tasks_per_second,
            stage_stats,
            failures,
            slowest_tasks,
        }
    }

    /// Human-readable report, one section per aggregation.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "pipeline execution report");
        let _ = writeln!(out, "  execution time: {:.2}s", self.execution_time);
        let _ = writeln!(out, "  total tasks:    {}", self.total_tasks);
        let _ = writeln!(out, "  successful:     {}", self.successful_tasks);
        let _ = writeln!(out, "  failed:         {}", self.failed_tasks);
        let _ = writeln!(out, "  skipped:        {}", self.skipped_tasks);
        let _ = writeln!(out, "  success rate:   {:.1}%", self.success_rate * 100.0);
        let _ = writeln!(out, "  tasks/second:   {:.2}", self.tasks_per_second);

        if !self.stage_stats.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "stages:");
            for (stage, stats) in &self.stage_stats {
                let _ = writeln!(
                    out,
                    "  {:<10} total {:>3}  success {:>3}  failed {:>3}",
                    stage, stats.total, stats.success, stats.failed
                );
            }
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "failed tasks ({}):", self.failures.len());
            for (task_id, error) in &self.failures {
                let _ = writeln!(out, "  - {task_id}: {error}");
            }
        }

        if !self.slowest_tasks.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "slowest tasks:");
            for (task_id, duration) in &self.slowest_tasks {
                let _ = writeln!(out, "  - {task_id}: {duration:.2}s");
            }
        }

        out
    }
}

fn count(results: &PipelineResults, status: TaskStatus) -> usize {
    results.values().filter(|r| r.status == status).count()
}
