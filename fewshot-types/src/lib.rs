//! # fewshot-types: Protocol types for few-shot program optimization
//!
//! This crate defines the data model and the collaborator boundaries that
//! an optimizer needs in order to search over demonstration sets for a
//! program made of one or more predictors.
//!
//! ## The Protocols
//!
//! | Protocol | Trait | What it does |
//! |----------|-------|-------------|
//! | ① Program | [`Program`] | Runs one example through its predictors |
//! | ② Metric | [`Metric`] | Scores a prediction against ground truth |
//! | ③ Evaluation | [`Evaluator`] | Scores a program over a whole dataset |
//! | ④ Compilation | [`Teleprompter`] | Attaches demonstrations to a program |
//!
//! ## Design Principle
//!
//! The optimizer never looks inside a predictor. [`Predictor`] is just a
//! named slot holding demonstrations; how those demonstrations reach a
//! model is the [`Program`] implementation's concern. This keeps the
//! search loop independent of any particular model provider or prompt
//! format.
//!
//! ## Async Traits
//!
//! [`Program`], [`Evaluator`] and [`Teleprompter`] use `async-trait`.
//! They are generic over the program type and therefore not object-safe;
//! [`Metric`] is the only trait meant to be used as `dyn`.

#![deny(missing_docs)]

pub mod error;
pub mod evaluator;
pub mod example;
pub mod metric;
pub mod program;
pub mod teleprompter;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use error::{CompileError, EvalError, MetricError, ProgramError};
pub use evaluator::{Evaluator, ScoreRecord};
pub use example::{Example, Prediction};
pub use metric::Metric;
pub use program::{Predictor, Program, ProgramOutput, TraceStep};
pub use teleprompter::Teleprompter;
