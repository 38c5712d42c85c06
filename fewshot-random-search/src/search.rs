use crate::config::RandomSearchConfig;
use crate::error::SearchError;
use crate::policy::CandidatePolicy;
use crate::robustness::RobustnessStat;
use crate::state::{CandidateRecord, SearchState};
use crate::strategy::{CandidateStrategy, seeds};
use crate::tracker::BestTracker;
use async_trait::async_trait;
use fewshot_eval::ParallelEvaluator;
use fewshot_types::error::CompileError;
use fewshot_types::evaluator::{Evaluator, ScoreRecord};
use fewshot_types::example::Example;
use fewshot_types::metric::Metric;
use fewshot_types::program::Program;
use fewshot_types::teleprompter::Teleprompter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Inputs to one search.
pub struct SearchRequest<'a, P> {
    /// Program whose demonstrations are being chosen. Never modified.
    pub student: &'a P,
    /// Program that produces bootstrap traces. Defaults to a copy of the
    /// student.
    pub teacher: Option<&'a P>,
    /// Examples demonstrations are drawn from.
    pub trainset: &'a [Example],
    /// Examples candidates are scored on. Defaults to the training set.
    pub valset: Option<&'a [Example]>,
}

impl<'a, P> SearchRequest<'a, P> {
    /// Search demonstrations for `student` drawn from `trainset`.
    pub fn new(student: &'a P, trainset: &'a [Example]) -> Self {
        Self {
            student,
            teacher: None,
            trainset,
            valset: None,
        }
    }

    /// Bootstrap with `teacher` instead of a copy of the student.
    pub fn with_teacher(mut self, teacher: &'a P) -> Self {
        self.teacher = Some(teacher);
        self
    }

    /// Score candidates on `valset` instead of the training set.
    pub fn with_valset(mut self, valset: &'a [Example]) -> Self {
        self.valset = Some(valset);
        self
    }
}

/// A candidate that could not be built or scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedCandidate {
    /// Seed of the skipped candidate.
    pub seed: i64,
    /// Its strategy.
    pub strategy: CandidateStrategy,
    /// Why it was skipped.
    pub reason: String,
}

/// Result of a completed search.
#[derive(Debug)]
pub struct SearchOutcome<P> {
    /// The best candidate program.
    pub best: P,
    /// Seed the best candidate was built from.
    pub best_seed: i64,
    /// Its validation score.
    pub best_score: f64,
    /// Every scored candidate, in seed order.
    pub history: Vec<CandidateRecord>,
    /// Top-K robustness over the full history.
    pub robustness: Vec<RobustnessStat>,
    /// Candidates left out of the history.
    pub skipped: Vec<SkippedCandidate>,
}

impl<P> SearchOutcome<P> {
    /// Aggregate scores in seed order.
    pub fn scores(&self) -> Vec<f64> {
        self.history.iter().map(|c| c.record.score).collect()
    }

    /// Running maximum after each scored candidate.
    pub fn max_score_trace(&self) -> Vec<f64> {
        let mut max: Option<f64> = None;
        self.history
            .iter()
            .map(|c| {
                let next = max.map_or(c.record.score, |m| m.max(c.record.score));
                max = Some(next);
                next
            })
            .collect()
    }

    /// The history entry of the best candidate.
    pub fn best_candidate(&self) -> Option<&CandidateRecord> {
        self.history.iter().rev().find(|c| c.seed == self.best_seed)
    }
}

/// Random search over demonstration sets.
///
/// Builds `num_candidate_sets + 3` candidates from the same student, scores
/// each on the validation set, and returns the best. Candidates are processed
/// one after another; each evaluation runs up to `concurrency` examples at
/// once through the evaluator.
///
/// A candidate whose compile or evaluation fails is skipped and the search
/// continues. The search fails only when every candidate is skipped.
pub struct RandomSearch<E: Evaluator = ParallelEvaluator> {
    metric: Arc<dyn Metric>,
    config: RandomSearchConfig,
    evaluator: E,
}

impl RandomSearch<ParallelEvaluator> {
    /// Create a search scoring with `metric`, using the parallel evaluator.
    pub fn new(metric: Arc<dyn Metric>, config: RandomSearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            metric,
            config,
            evaluator: ParallelEvaluator::new(),
        })
    }
}

impl<E: Evaluator> RandomSearch<E> {
    /// Score candidates with `evaluator` instead.
    pub fn with_evaluator<F: Evaluator>(self, evaluator: F) -> RandomSearch<F> {
        RandomSearch {
            metric: self.metric,
            config: self.config,
            evaluator,
        }
    }

    /// The search configuration.
    pub fn config(&self) -> &RandomSearchConfig {
        &self.config
    }

    /// The evaluator candidates are scored with.
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Run the search.
    pub async fn search<P: Program>(
        &self,
        request: SearchRequest<'_, P>,
    ) -> Result<SearchOutcome<P>, SearchError> {
        let policy = CandidatePolicy::new(Arc::clone(&self.metric), self.config.clone());
        let devset: Arc<[Example]> = request.valset.unwrap_or(request.trainset).into();

        tracing::info!(
            candidates = self.config.total_candidates(),
            trainset = request.trainset.len(),
            valset = devset.len(),
            min_bootstrapped = self.config.min_bootstrapped_demos,
            max_bootstrapped = self.config.max_bootstrapped_demos,
            "fewshot.search.start"
        );

        let mut state: SearchState<P> = SearchState::new();
        let mut skipped: Vec<SkippedCandidate> = vec![];

        for seed in seeds(self.config.num_candidate_sets) {
            let strategy = CandidateStrategy::for_seed(seed, &self.config)?;
            tracing::debug!(seed, %strategy, "fewshot.search.candidate_start");

            let (program, record) = match self
                .run_candidate(&policy, &strategy, &request, &devset)
                .await
            {
                Ok(scored) => scored,
                Err(e) if e.is_candidate_failure() => {
                    tracing::warn!(seed, %strategy, error = %e, "fewshot.search.skipped");
                    skipped.push(SkippedCandidate {
                        seed,
                        strategy,
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let demo_counts = program.demo_counts();
            let score = record.score;
            tracing::info!(seed, %strategy, score, demos = ?demo_counts, "fewshot.search.candidate");

            let observation = state.observe(
                CandidateRecord {
                    seed,
                    strategy,
                    demo_counts,
                    record,
                },
                program,
            );

            tracing::debug!(scores = ?state.scores(), "fewshot.search.scores");
            if observation.new_best {
                tracing::info!(seed, score, "fewshot.search.new_best");
            }
            tracing::info!(max_score = observation.max_score, "fewshot.search.best");
            for stat in state.robustness() {
                tracing::info!(
                    k = %stat.k,
                    candidates = stat.candidates,
                    average_of_max_per_entry = stat.average_of_max_per_entry,
                    "fewshot.search.robustness"
                );
            }
        }

        let robustness = state.robustness();
        let (history, best) = state.into_parts();
        let BestTracker::HaveBest {
            seed: best_seed,
            score: best_score,
            program,
        } = best
        else {
            return Err(SearchError::NoCandidates {
                skipped: skipped.len(),
            });
        };

        tracing::info!(
            best_seed,
            best_score,
            scored = history.len(),
            skipped = skipped.len(),
            "fewshot.search.complete"
        );

        Ok(SearchOutcome {
            best: Arc::try_unwrap(program).unwrap_or_else(|shared| P::clone(&shared)),
            best_seed,
            best_score,
            history,
            robustness,
            skipped,
        })
    }

    async fn run_candidate<P: Program>(
        &self,
        policy: &CandidatePolicy,
        strategy: &CandidateStrategy,
        request: &SearchRequest<'_, P>,
        devset: &Arc<[Example]>,
    ) -> Result<(Arc<P>, ScoreRecord), SearchError> {
        let program = policy
            .generate(strategy, request.student, request.teacher, request.trainset)
            .await?;
        let program = Arc::new(program);
        let record = self
            .evaluator
            .evaluate(
                Arc::clone(&program),
                Arc::clone(devset),
                Arc::clone(&self.metric),
                self.config.concurrency,
            )
            .await?;
        Ok((program, record))
    }
}

#[async_trait]
impl<E: Evaluator> Teleprompter for RandomSearch<E> {
    async fn compile<P: Program>(
        &self,
        student: &P,
        teacher: Option<&P>,
        trainset: &[Example],
    ) -> Result<P, CompileError> {
        let mut request = SearchRequest::new(student, trainset);
        request.teacher = teacher;
        match self.search(request).await {
            Ok(outcome) => Ok(outcome.best),
            Err(SearchError::Compile(e)) => Err(e),
            Err(other) => Err(CompileError::Other(Box::new(other))),
        }
    }
}
