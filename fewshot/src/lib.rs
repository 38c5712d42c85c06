#![deny(missing_docs)]
//! # fewshot: umbrella crate
//!
//! A single import surface for the fewshot crates. Re-exports the protocol
//! crate and each implementation behind a feature flag, plus a `prelude`
//! for the common path: build a [`RandomSearch`](prelude::RandomSearch),
//! hand it a student program and a training set, keep the best candidate.

#[cfg(feature = "core")]
pub use fewshot_types;
#[cfg(feature = "eval")]
pub use fewshot_eval;
#[cfg(feature = "teleprompt")]
pub use fewshot_teleprompt;
#[cfg(feature = "random-search")]
pub use fewshot_random_search;

/// Happy-path imports.
pub mod prelude {
    #[cfg(feature = "core")]
    pub use fewshot_types::{
        CompileError, EvalError, Evaluator, Example, Metric, MetricError, Prediction, Predictor,
        Program, ProgramError, ProgramOutput, ScoreRecord, Teleprompter, TraceStep,
    };

    #[cfg(feature = "eval")]
    pub use fewshot_eval::ParallelEvaluator;
    #[cfg(feature = "eval")]
    pub use fewshot_eval::metrics::{exact_match, normalized_match};

    #[cfg(feature = "teleprompt")]
    pub use fewshot_teleprompt::{BootstrapConfig, BootstrapFewShot, LabeledFewShot};

    #[cfg(feature = "random-search")]
    pub use fewshot_random_search::{
        CandidateStrategy, RandomSearch, RandomSearchConfig, SearchError, SearchOutcome,
        SearchRequest,
    };
}
