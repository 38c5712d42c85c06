use async_trait::async_trait;
use fewshot_types::error::EvalError;
use fewshot_types::evaluator::{Evaluator, ScoreRecord};
use fewshot_types::example::Example;
use fewshot_types::metric::Metric;
use fewshot_types::program::Program;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Sub-score recorded for an example whose program run or metric failed.
pub const FAILURE_SCORE: f64 = 0.0;

/// Evaluator that scores examples concurrently on tokio tasks.
///
/// One task is spawned per example; at most `concurrency` of them run a
/// program at any time (clamped to `1..=Semaphore::MAX_PERMITS`). Results
/// are returned in dataset order no matter which task finishes first.
///
/// An example whose program or metric errors, returns a non-finite score,
/// or panics gets [`FAILURE_SCORE`]; the other examples are unaffected.
///
/// Suitable for development, testing, and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct ParallelEvaluator {
    max_errors: Option<usize>,
}

impl ParallelEvaluator {
    /// Create an evaluator that tolerates any number of failed examples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the whole evaluation when more than `max_errors` examples fail.
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = Some(max_errors);
        self
    }
}

/// Run one example and score it. `Err` carries a human-readable reason.
async fn score_example<P: Program>(
    program: &P,
    example: &Example,
    metric: &dyn Metric,
) -> Result<f64, String> {
    let output = program.forward(example).await.map_err(|e| e.to_string())?;
    let score = metric
        .score(example, &output.prediction, None)
        .map_err(|e| e.to_string())?;
    if score.is_finite() {
        Ok(score)
    } else {
        Err(format!("metric returned non-finite score {score}"))
    }
}

#[async_trait]
impl Evaluator for ParallelEvaluator {
    async fn evaluate<P: Program>(
        &self,
        program: Arc<P>,
        devset: Arc<[Example]>,
        metric: Arc<dyn Metric>,
        concurrency: usize,
    ) -> Result<ScoreRecord, EvalError> {
        let permits = Arc::new(Semaphore::new(concurrency.clamp(1, Semaphore::MAX_PERMITS)));
        let mut handles = Vec::with_capacity(devset.len());

        for index in 0..devset.len() {
            let program = Arc::clone(&program);
            let devset = Arc::clone(&devset);
            let metric = Arc::clone(&metric);
            let permits = Arc::clone(&permits);
            handles.push(tokio::spawn(async move {
                let _permit = match permits.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => return Err(e.to_string()),
                };
                score_example(program.as_ref(), &devset[index], metric.as_ref()).await
            }));
        }

        let mut subscores = Vec::with_capacity(handles.len());
        let mut failed = 0usize;
        let mut pending = handles.into_iter().enumerate();
        while let Some((index, handle)) = pending.next() {
            match handle.await {
                Ok(Ok(score)) => subscores.push(score),
                Ok(Err(reason)) => {
                    tracing::warn!(example = index, error = %reason, "fewshot.eval.example_failed");
                    failed += 1;
                    subscores.push(FAILURE_SCORE);
                }
                Err(e) if e.is_panic() => {
                    tracing::warn!(example = index, error = %e, "fewshot.eval.example_panicked");
                    failed += 1;
                    subscores.push(FAILURE_SCORE);
                }
                Err(e) => {
                    for (_, rest) in pending.by_ref() {
                        rest.abort();
                    }
                    return Err(EvalError::WorkerFailed(e.to_string()));
                }
            }
        }

        if let Some(max) = self.max_errors {
            if failed > max {
                return Err(EvalError::TooManyErrors { failed, max });
            }
        }

        let score = if subscores.is_empty() {
            0.0
        } else {
            subscores.iter().sum::<f64>() / subscores.len() as f64
        };
        tracing::debug!(
            examples = subscores.len(),
            failed,
            score,
            "fewshot.eval.complete"
        );
        Ok(ScoreRecord::new(score, subscores))
    }
}
