//! The Metric protocol: how a prediction is scored against ground truth.

use crate::{
    error::MetricError,
    example::{Example, Prediction},
    program::TraceStep,
};

/// Protocol ②: The Metric
///
/// Compares a prediction (and, during bootstrapping, the trace that
/// produced it) against an example's labels. Higher is better.
///
/// `trace` is `Some` when the metric is used to decide whether a run is
/// good enough to become a demonstration, and `None` during evaluation.
/// Metrics can use this to be stricter while bootstrapping.
///
/// Any `Fn(&Example, &Prediction, Option<&[TraceStep]>) -> f64` is a
/// metric. Implement the trait directly when scoring can fail.
pub trait Metric: Send + Sync {
    /// Score one prediction.
    fn score(
        &self,
        example: &Example,
        prediction: &Prediction,
        trace: Option<&[TraceStep]>,
    ) -> Result<f64, MetricError>;
}

impl<F> Metric for F
where
    F: Fn(&Example, &Prediction, Option<&[TraceStep]>) -> f64 + Send + Sync,
{
    fn score(
        &self,
        example: &Example,
        prediction: &Prediction,
        trace: Option<&[TraceStep]>,
    ) -> Result<f64, MetricError> {
        Ok(self(example, prediction, trace))
    }
}
