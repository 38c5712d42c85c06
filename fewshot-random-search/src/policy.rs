use crate::config::RandomSearchConfig;
use crate::error::SearchError;
use crate::strategy::{CandidateStrategy, shuffled};
use fewshot_teleprompt::{BootstrapFewShot, LabeledFewShot};
use fewshot_types::error::CompileError;
use fewshot_types::example::Example;
use fewshot_types::metric::Metric;
use fewshot_types::program::Program;
use fewshot_types::teleprompter::Teleprompter;
use std::sync::Arc;

/// Builds the candidate program for a strategy.
///
/// Every candidate starts from a fresh copy of the student; the student
/// itself is never modified.
pub struct CandidatePolicy {
    metric: Arc<dyn Metric>,
    config: RandomSearchConfig,
}

impl CandidatePolicy {
    /// Create a policy scoring bootstrap traces with `metric`.
    pub fn new(metric: Arc<dyn Metric>, config: RandomSearchConfig) -> Self {
        Self { metric, config }
    }

    /// The configuration candidates are built from.
    pub fn config(&self) -> &RandomSearchConfig {
        &self.config
    }

    /// Map `seed` to its strategy and build that candidate.
    ///
    /// An out-of-range seed fails with [`SearchError::InvalidSeed`] before
    /// any compiler runs.
    pub async fn generate_for_seed<P: Program>(
        &self,
        seed: i64,
        student: &P,
        teacher: Option<&P>,
        trainset: &[Example],
    ) -> Result<(CandidateStrategy, P), SearchError> {
        let strategy = CandidateStrategy::for_seed(seed, &self.config)?;
        let program = self.generate(&strategy, student, teacher, trainset).await?;
        Ok((strategy, program))
    }

    /// Build the candidate for `strategy`.
    pub async fn generate<P: Program>(
        &self,
        strategy: &CandidateStrategy,
        student: &P,
        teacher: Option<&P>,
        trainset: &[Example],
    ) -> Result<P, CompileError> {
        match *strategy {
            CandidateStrategy::ZeroShot => Ok(student.reset_copy()),
            CandidateStrategy::LabeledOnly => {
                LabeledFewShot::new(self.config.max_labeled_demos)
                    .compile(student, teacher, trainset)
                    .await
            }
            CandidateStrategy::UnshuffledBootstrap => {
                self.bootstrapper(self.config.max_bootstrapped_demos)
                    .compile(student, teacher, trainset)
                    .await
            }
            CandidateStrategy::RandomizedBootstrap { seed, size } => {
                let trainset = shuffled(trainset, seed);
                self.bootstrapper(size)
                    .compile(student, teacher, &trainset)
                    .await
            }
        }
    }

    fn bootstrapper(&self, max_bootstrapped: usize) -> BootstrapFewShot {
        BootstrapFewShot::new(
            Arc::clone(&self.metric),
            self.config.bootstrap_config(max_bootstrapped),
        )
    }
}
