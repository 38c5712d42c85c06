//! In-memory implementations for testing.
//!
//! Available behind the `test-utils` feature flag. These are minimal
//! implementations that prove the trait APIs are usable and give
//! optimizer tests fully deterministic programs and evaluators.

mod echo_program;
mod failing_program;
mod scripted_evaluator;
mod table_program;

pub use echo_program::EchoProgram;
pub use failing_program::FailingProgram;
pub use scripted_evaluator::{EvaluationCall, ScriptedEvaluator};
pub use table_program::TableProgram;

use crate::example::Example;

/// Build `n` question/answer examples: `q{i}` → `a{i}`, with `question`
/// as the only input.
pub fn qa_examples(n: usize) -> Vec<Example> {
    (0..n)
        .map(|i| {
            Example::new()
                .with("question", format!("q{i}"))
                .with("answer", format!("a{i}"))
                .with_inputs(["question"])
        })
        .collect()
}
