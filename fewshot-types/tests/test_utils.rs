//! The in-memory test programs and evaluator behave as documented.
//! Run with: cargo test --features test-utils --test test_utils

#![cfg(feature = "test-utils")]

use fewshot_types::test_utils::{
    EchoProgram, FailingProgram, ScriptedEvaluator, TableProgram, qa_examples,
};
use fewshot_types::*;
use serde_json::json;
use std::sync::Arc;

fn noop_metric() -> Arc<dyn Metric> {
    Arc::new(|_: &Example, _: &Prediction, _: Option<&[TraceStep]>| 0.0)
}

#[tokio::test]
async fn echo_program_copies_input_and_traces() {
    let program = EchoProgram::new("question", "answer");
    let ex = Example::new().with("question", "hi").with_inputs(["question"]);

    let output = program.forward(&ex).await.unwrap();
    assert_eq!(output.prediction.get_str("answer"), Some("hi"));
    assert_eq!(output.trace.len(), 1);
    assert_eq!(output.trace[0].predictor, "echo");
}

#[tokio::test]
async fn echo_program_missing_input_fails() {
    let program = EchoProgram::new("question", "answer");
    let result = program.forward(&Example::new()).await;
    assert!(matches!(result, Err(ProgramError::InvalidInput(_))));
}

#[tokio::test]
async fn table_program_answers_known_questions() {
    let train = qa_examples(3);
    let program = TableProgram::with_predictors(["draft", "final"]).answering(&train[..2]);

    let output = program.forward(&train[1]).await.unwrap();
    assert_eq!(output.prediction.get("answer"), Some(&json!("a1")));
    let names: Vec<_> = output.trace.iter().map(|s| s.predictor.as_str()).collect();
    assert_eq!(names, ["draft", "final"]);

    let miss = program.forward(&train[2]).await;
    assert!(matches!(miss, Err(ProgramError::Predictor { .. })));
}

#[tokio::test]
async fn table_program_clones_share_answers() {
    let program = TableProgram::new().answer("q0", "a0");
    let copy = program.reset_copy();
    let output = copy.forward(&qa_examples(1)[0]).await.unwrap();
    assert_eq!(output.prediction.get_str("answer"), Some("a0"));
}

#[tokio::test]
async fn failing_program_always_fails() {
    let result = FailingProgram::new().forward(&qa_examples(1)[0]).await;
    assert!(matches!(result, Err(ProgramError::Model(_))));
}

#[tokio::test]
async fn scripted_evaluator_replays_then_defaults() {
    let eval = ScriptedEvaluator::new(vec![
        Ok(ScoreRecord::new(0.7, vec![1.0, 0.4])),
        Err("boom".into()),
    ]);
    let devset: Arc<[Example]> = qa_examples(2).into();
    let program = Arc::new(TableProgram::new());

    let first = eval
        .evaluate(Arc::clone(&program), Arc::clone(&devset), noop_metric(), 4)
        .await
        .unwrap();
    assert_eq!(first.score, 0.7);

    let second = eval
        .evaluate(Arc::clone(&program), Arc::clone(&devset), noop_metric(), 4)
        .await;
    assert!(matches!(second, Err(EvalError::WorkerFailed(_))));

    let third = eval
        .evaluate(program, devset, noop_metric(), 4)
        .await
        .unwrap();
    assert_eq!(third, ScoreRecord::new(0.0, vec![0.0, 0.0]));

    let calls = eval.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].demo_counts, vec![0]);
    assert_eq!(calls[0].devset_len, 2);
    assert_eq!(calls[0].concurrency, 4);
}
