//! ScriptedEvaluator: returns queued results in call order.

use crate::error::EvalError;
use crate::evaluator::{Evaluator, ScoreRecord};
use crate::example::Example;
use crate::metric::Metric;
use crate::program::Program;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// What the evaluator saw on one call.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationCall {
    /// Demo counts of the evaluated program, per predictor.
    pub demo_counts: Vec<usize>,
    /// Size of the dataset it was asked to score.
    pub devset_len: usize,
    /// Requested concurrency.
    pub concurrency: usize,
}

/// An evaluator that ignores the program and replays queued results.
///
/// Each call pops the next entry: `Ok(record)` is returned as-is and
/// `Err(message)` becomes [`EvalError::WorkerFailed`]. Once the queue is
/// empty every call scores 0.0 with a zero sub-score per example.
/// Use `.calls()` to inspect what was evaluated.
pub struct ScriptedEvaluator {
    script: Mutex<VecDeque<Result<ScoreRecord, String>>>,
    calls: Mutex<Vec<EvaluationCall>>,
}

impl ScriptedEvaluator {
    /// Create an evaluator that replays `script`.
    pub fn new(script: Vec<Result<ScoreRecord, String>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create an evaluator that returns these aggregate scores, each with
    /// `devset_len` sub-scores equal to the aggregate.
    pub fn from_scores(scores: &[f64], devset_len: usize) -> Self {
        Self::new(
            scores
                .iter()
                .map(|&s| Ok(ScoreRecord::new(s, vec![s; devset_len])))
                .collect(),
        )
    }

    /// Return a snapshot of all recorded calls.
    pub fn calls(&self) -> Vec<EvaluationCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Evaluator for ScriptedEvaluator {
    async fn evaluate<P: Program>(
        &self,
        program: Arc<P>,
        devset: Arc<[Example]>,
        _metric: Arc<dyn Metric>,
        concurrency: usize,
    ) -> Result<ScoreRecord, EvalError> {
        self.calls.lock().unwrap().push(EvaluationCall {
            demo_counts: program.demo_counts(),
            devset_len: devset.len(),
            concurrency,
        });
        match self.script.lock().unwrap().pop_front() {
            Some(Ok(record)) => Ok(record),
            Some(Err(message)) => Err(EvalError::WorkerFailed(message)),
            None => Ok(ScoreRecord::new(0.0, vec![0.0; devset.len()])),
        }
    }
}
