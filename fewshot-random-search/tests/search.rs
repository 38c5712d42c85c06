use fewshot_eval::metrics::exact_match;
use fewshot_random_search::{
    CandidatePolicy, CandidateStrategy, RandomSearch, RandomSearchConfig, SearchError,
    SearchRequest, TopK,
};
use fewshot_types::error::CompileError;
use fewshot_types::evaluator::ScoreRecord;
use fewshot_types::example::Example;
use fewshot_types::metric::Metric;
use fewshot_types::program::Program;
use fewshot_types::teleprompter::Teleprompter;
use fewshot_types::test_utils::{ScriptedEvaluator, TableProgram, qa_examples};
use std::sync::Arc;

fn metric() -> Arc<dyn Metric> {
    Arc::new(exact_match("answer"))
}

fn scripted(
    config: RandomSearchConfig,
    evaluator: ScriptedEvaluator,
) -> RandomSearch<ScriptedEvaluator> {
    RandomSearch::new(metric(), config)
        .unwrap()
        .with_evaluator(evaluator)
}

fn n(num_candidate_sets: usize) -> RandomSearchConfig {
    RandomSearchConfig::default().with_num_candidate_sets(num_candidate_sets)
}

// --- Best candidate selection ---

#[tokio::test]
async fn best_randomized_candidate_wins() {
    let train = qa_examples(20);
    let val: Vec<Example> = qa_examples(30).split_off(20);
    let student = TableProgram::new().answering(&train);
    let scores = [0.1, 0.3, 0.6, 0.5, 0.4, 0.8, 0.2, 0.5];
    let search = scripted(n(5), ScriptedEvaluator::from_scores(&scores, 10));

    let outcome = search
        .search(SearchRequest::new(&student, &train).with_valset(&val))
        .await
        .unwrap();

    assert_eq!(outcome.history.len(), 8);
    assert_eq!(outcome.best_seed, 2);
    assert_eq!(outcome.best_score, 0.8);
    assert_eq!(
        outcome.max_score_trace(),
        vec![0.1, 0.3, 0.6, 0.6, 0.6, 0.8, 0.8, 0.8]
    );

    // The returned program is the seed-2 candidate.
    let calls = search.evaluator().calls();
    assert_eq!(outcome.best.demo_counts(), calls[5].demo_counts);
    let (_, expected) = CandidatePolicy::new(metric(), n(5))
        .generate_for_seed(2, &student, None, &train)
        .await
        .unwrap();
    assert_eq!(
        outcome.best.predictors()[0].demos,
        expected.predictors()[0].demos
    );

    // Every candidate was scored on the validation set.
    assert!(calls.iter().all(|c| c.devset_len == 10));
}

#[tokio::test]
async fn ties_go_to_the_later_candidate() {
    let train = qa_examples(6);
    let student = TableProgram::new().answering(&train);
    let outcome = scripted(n(0), ScriptedEvaluator::from_scores(&[0.5, 0.5, 0.5], 6))
        .search(SearchRequest::new(&student, &train))
        .await
        .unwrap();

    assert_eq!(outcome.best_seed, -1);
    assert_eq!(
        outcome.best_candidate().map(|c| c.strategy),
        Some(CandidateStrategy::UnshuffledBootstrap)
    );
}

#[tokio::test]
async fn best_score_is_max_of_history() {
    let train = qa_examples(8);
    let student = TableProgram::new().answering(&train);
    let scores = [0.4, 0.9, 0.1, 0.9, 0.3, 0.2];
    let outcome = scripted(n(3), ScriptedEvaluator::from_scores(&scores, 8))
        .search(SearchRequest::new(&student, &train))
        .await
        .unwrap();

    assert_eq!(outcome.best_score, 0.9);
    assert_eq!(outcome.best_seed, 0);
    let trace = outcome.max_score_trace();
    assert!(trace.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(trace.last().copied(), Some(outcome.best_score));
}

// --- Candidate construction ---

#[tokio::test]
async fn fixed_candidates_have_expected_demos() {
    let train = qa_examples(20);
    let mut student = TableProgram::new().answering(&train);
    student.predictors_mut()[0].demos = qa_examples(3);
    let config = n(2).with_max_labeled_demos(5);
    let search = scripted(config, ScriptedEvaluator::new(vec![]));

    search
        .search(SearchRequest::new(&student, &train))
        .await
        .unwrap();

    let calls = search.evaluator().calls();
    assert_eq!(calls.len(), 5);
    assert_eq!(calls[0].demo_counts, vec![0]);
    assert_eq!(calls[1].demo_counts, vec![5]);
    assert!(calls[2].demo_counts[0] <= 4 + 5);
    assert_eq!(student.demo_counts(), vec![3]);
}

#[tokio::test]
async fn repeated_searches_are_identical() {
    let train = qa_examples(12);
    let student = TableProgram::new().answering(&train);
    let config = n(4).with_bootstrapped_demos(1, 3).with_max_labeled_demos(2);

    let run = || async {
        let search = RandomSearch::new(metric(), config.clone()).unwrap();
        search
            .search(SearchRequest::new(&student, &train))
            .await
            .unwrap()
    };
    let a = run().await;
    let b = run().await;

    assert_eq!(a.history, b.history);
    assert_eq!(a.best_seed, b.best_seed);
    assert_eq!(a.best.predictors()[0].demos, b.best.predictors()[0].demos);
}

// --- Robustness ---

#[tokio::test]
async fn robustness_covers_every_size_with_short_history() {
    let train = qa_examples(4);
    let student = TableProgram::new().answering(&train);
    let evaluator = ScriptedEvaluator::new(vec![
        Ok(ScoreRecord::new(0.5, vec![1.0, 0.0, 1.0, 0.0])),
        Ok(ScoreRecord::new(0.5, vec![0.0, 1.0, 0.0, 1.0])),
        Ok(ScoreRecord::new(0.25, vec![0.0, 0.0, 0.0, 1.0])),
    ]);
    let outcome = scripted(n(0), evaluator)
        .search(SearchRequest::new(&student, &train))
        .await
        .unwrap();

    let ks: Vec<TopK> = outcome.robustness.iter().map(|s| s.k).collect();
    assert_eq!(
        ks,
        vec![
            TopK::K(1),
            TopK::K(2),
            TopK::K(3),
            TopK::K(5),
            TopK::K(8),
            TopK::All
        ]
    );
    assert_eq!(outcome.robustness[0].average_of_max_per_entry, 0.5);
    assert!(
        outcome.robustness[1..]
            .iter()
            .all(|s| s.average_of_max_per_entry == 1.0)
    );
}

#[tokio::test]
async fn robustness_is_skipped_without_subscores() {
    let train = qa_examples(4);
    let student = TableProgram::new().answering(&train);
    let evaluator = ScriptedEvaluator::new(vec![
        Ok(ScoreRecord::new(0.1, vec![])),
        Ok(ScoreRecord::new(0.2, vec![])),
        Ok(ScoreRecord::new(0.3, vec![])),
    ]);
    let outcome = scripted(n(0), evaluator)
        .search(SearchRequest::new(&student, &train))
        .await
        .unwrap();

    assert!(outcome.robustness.is_empty());
    assert_eq!(outcome.best_seed, -1);
}

// --- Failure policy ---

#[tokio::test]
async fn failed_evaluation_skips_the_candidate() {
    let train = qa_examples(4);
    let student = TableProgram::new().answering(&train);
    let evaluator = ScriptedEvaluator::new(vec![
        Ok(ScoreRecord::new(0.2, vec![0.2; 4])),
        Err("evaluator crashed".into()),
        Ok(ScoreRecord::new(0.4, vec![0.4; 4])),
    ]);
    let outcome = scripted(n(0), evaluator)
        .search(SearchRequest::new(&student, &train))
        .await
        .unwrap();

    let seeds: Vec<i64> = outcome.history.iter().map(|c| c.seed).collect();
    assert_eq!(seeds, vec![-3, -1]);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].seed, -2);
    assert_eq!(outcome.skipped[0].strategy, CandidateStrategy::LabeledOnly);
    assert!(outcome.skipped[0].reason.contains("evaluator crashed"));
    assert_eq!(outcome.best_seed, -1);
}

#[tokio::test]
async fn failed_compile_skips_the_candidate() {
    let train = qa_examples(6);
    let student = TableProgram::new().answering(&train);
    // A teacher with different predictors cannot bootstrap for the student.
    let teacher = TableProgram::with_predictors(["other"]).answering(&train);

    let outcome = scripted(n(2), ScriptedEvaluator::from_scores(&[0.1, 0.2], 6))
        .search(SearchRequest::new(&student, &train).with_teacher(&teacher))
        .await
        .unwrap();

    let seeds: Vec<i64> = outcome.history.iter().map(|c| c.seed).collect();
    assert_eq!(seeds, vec![-3, -2]);
    let skipped: Vec<i64> = outcome.skipped.iter().map(|s| s.seed).collect();
    assert_eq!(skipped, vec![-1, 0, 1]);
    assert_eq!(outcome.best_seed, -2);
}

#[tokio::test]
async fn all_candidates_failing_is_an_error() {
    let train = qa_examples(3);
    let student = TableProgram::new().answering(&train);
    let evaluator = ScriptedEvaluator::new(vec![Err("a".into()), Err("b".into()), Err("c".into())]);

    let result = scripted(n(0), evaluator)
        .search(SearchRequest::new(&student, &train))
        .await;
    assert!(matches!(result, Err(SearchError::NoCandidates { skipped: 3 })));
}

// --- Teleprompter ---

#[tokio::test]
async fn compiles_as_a_teleprompter() {
    let train = qa_examples(6);
    let student = TableProgram::new().answering(&train);
    let search = scripted(n(1), ScriptedEvaluator::from_scores(&[0.9, 0.1, 0.1, 0.1], 6));

    let compiled = search.compile(&student, None, &train).await.unwrap();
    assert_eq!(compiled.demo_counts(), vec![0]);
}

#[tokio::test]
async fn teleprompter_reports_search_failure() {
    let train = qa_examples(2);
    let student = TableProgram::new().answering(&train);
    let evaluator = ScriptedEvaluator::new(vec![Err("x".into()), Err("y".into()), Err("z".into())]);

    let result = scripted(n(0), evaluator)
        .compile(&student, None, &train)
        .await;
    assert!(matches!(result, Err(CompileError::Other(_))));
}

#[tokio::test]
async fn unbounded_concurrency_still_searches() {
    let train = qa_examples(4);
    let student = TableProgram::new().answering(&train);
    let config = n(0).with_concurrency(usize::MAX);
    assert!(config.validate().is_ok());

    let outcome = RandomSearch::new(metric(), config)
        .unwrap()
        .search(SearchRequest::new(&student, &train))
        .await
        .unwrap();

    assert_eq!(outcome.history.len(), 3);
    assert!(outcome.skipped.is_empty());
}
