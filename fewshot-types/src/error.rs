//! Error types for each protocol.

use thiserror::Error;

/// Program execution errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProgramError {
    /// A predictor inside the program failed.
    #[error("predictor {predictor} failed: {message}")]
    Predictor {
        /// Name of the predictor that failed.
        predictor: String,
        /// Error message.
        message: String,
    },

    /// An error from the model/LLM backing a predictor.
    #[error("model error: {0}")]
    Model(String),

    /// The example is missing an input the program needs.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Catch-all. Include context.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Metric errors. The metric could not produce a usable score.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum MetricError {
    /// The metric failed on this example.
    #[error("metric failed: {0}")]
    Failed(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Evaluation errors. Per-example failures are not errors: they are
/// recorded as failure sub-scores. These variants mean the evaluation as
/// a whole could not be completed.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum EvalError {
    /// A worker task was cancelled before it produced a score.
    #[error("evaluation worker failed: {0}")]
    WorkerFailed(String),

    /// More examples failed than the evaluator tolerates.
    #[error("too many failed examples: {failed} > max_errors={max}")]
    TooManyErrors {
        /// Number of examples that failed.
        failed: usize,
        /// The configured tolerance.
        max: usize,
    },

    /// A program error propagated through evaluation.
    #[error("program error: {0}")]
    Program(#[from] ProgramError),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Compilation (demonstration selection) errors.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CompileError {
    /// A program error propagated through compilation.
    #[error("program error: {0}")]
    Program(#[from] ProgramError),

    /// The compiler was configured with values it cannot honor.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catch-all.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
