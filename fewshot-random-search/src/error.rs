use fewshot_types::error::{CompileError, EvalError};
use thiserror::Error;

/// Errors returned by `fewshot-random-search`.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SearchError {
    /// A seed outside `-3..num_candidate_sets` reached the candidate policy.
    #[error("invalid seed {seed}: expected -3 <= seed < {num_candidate_sets}")]
    InvalidSeed {
        /// The rejected seed.
        seed: i64,
        /// Configured number of randomized candidates.
        num_candidate_sets: usize,
    },

    /// The configuration cannot be searched.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every candidate failed to compile or evaluate.
    #[error("no candidate could be scored ({skipped} skipped)")]
    NoCandidates {
        /// Number of candidates that were skipped.
        skipped: usize,
    },

    /// Building a candidate failed.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// Scoring a candidate failed.
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
}

impl SearchError {
    /// Whether this error only concerns one candidate, so the search can
    /// move on to the next seed.
    pub fn is_candidate_failure(&self) -> bool {
        matches!(self, SearchError::Compile(_) | SearchError::Eval(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_failures_are_compile_and_eval_only() {
        assert!(SearchError::from(EvalError::WorkerFailed("x".into())).is_candidate_failure());
        assert!(SearchError::from(CompileError::InvalidConfig("x".into())).is_candidate_failure());
        assert!(
            !SearchError::InvalidSeed {
                seed: -4,
                num_candidate_sets: 2
            }
            .is_candidate_failure()
        );
        assert!(!SearchError::NoCandidates { skipped: 3 }.is_candidate_failure());
    }

    #[test]
    fn invalid_seed_display() {
        let err = SearchError::InvalidSeed {
            seed: 7,
            num_candidate_sets: 5,
        };
        assert_eq!(err.to_string(), "invalid seed 7: expected -3 <= seed < 5");
    }
}
