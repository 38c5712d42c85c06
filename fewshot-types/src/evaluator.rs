//! The Evaluator protocol: how a program is scored over a dataset.

use crate::{error::EvalError, example::Example, metric::Metric, program::Program};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The result of evaluating one program over a dataset.
///
/// `subscores` holds one score per dataset example, in dataset order.
/// It is empty only when no per-example detail is available.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Aggregate score.
    pub score: f64,
    /// Per-example scores.
    #[serde(default)]
    pub subscores: Vec<f64>,
}

impl ScoreRecord {
    /// Create a new score record.
    pub fn new(score: f64, subscores: Vec<f64>) -> Self {
        Self { score, subscores }
    }

    /// Whether per-example detail is available.
    pub fn has_subscores(&self) -> bool {
        !self.subscores.is_empty()
    }
}

/// Protocol ③: Evaluation
///
/// Runs a program over every example of a dataset, scores each prediction
/// with the metric, and returns the aggregate plus per-example scores.
///
/// Implementations may run examples concurrently (up to `concurrency` at a
/// time); to the caller this is a single call that completes when every
/// example has a score. An example whose program run or metric fails is
/// NOT an error: its sub-score is a failure sentinel so the sub-score
/// sequence always matches the dataset length. `Err` means the evaluation
/// as a whole could not complete.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Evaluate `program` over `devset`.
    async fn evaluate<P: Program>(
        &self,
        program: Arc<P>,
        devset: Arc<[Example]>,
        metric: Arc<dyn Metric>,
        concurrency: usize,
    ) -> Result<ScoreRecord, EvalError>;
}
