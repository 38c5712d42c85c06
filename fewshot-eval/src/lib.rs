#![deny(missing_docs)]
//! In-process implementation of fewshot's Evaluator trait.
//!
//! Scores every example of a dataset on a bounded pool of tokio tasks.
//! Per-example failures become [`FAILURE_SCORE`] sub-scores instead of
//! aborting the evaluation. No retries, no timeouts, no caching.

pub mod metrics;

mod parallel;

pub use parallel::{FAILURE_SCORE, ParallelEvaluator};
