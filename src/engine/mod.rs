// src/engine/mod.rs

//! Execution engine.
//!
//! - [`executor`] runs a whole registry under a concurrency cap, gating
//!   each task on its dependencies' terminal states.
//! - [`retry`] runs one task's attempts with timeout and exponential
//!   backoff.

pub mod executor;
pub mod retry;

pub use executor::{ExecutionEngine, PipelineResults};
pub use retry::{AttemptOutcome, execute_with_retry};
