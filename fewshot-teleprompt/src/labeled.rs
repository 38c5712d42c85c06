use crate::sample::{DEMO_SAMPLE_SEED, sample_demos};
use async_trait::async_trait;
use fewshot_types::error::CompileError;
use fewshot_types::example::Example;
use fewshot_types::program::Program;
use fewshot_types::teleprompter::Teleprompter;

/// Attaches up to `k` labeled training examples to every predictor.
///
/// With sampling on (the default) the examples are a fixed-seed random
/// draw; with it off they are the first `k` examples in training order.
/// Every predictor receives the same set. The teacher is ignored.
#[derive(Debug, Clone)]
pub struct LabeledFewShot {
    k: usize,
    sample: bool,
}

impl LabeledFewShot {
    /// Create a labeled compiler attaching up to `k` demos per predictor.
    pub fn new(k: usize) -> Self {
        Self { k, sample: true }
    }

    /// Take the first `k` examples instead of sampling.
    pub fn without_sampling(mut self) -> Self {
        self.sample = false;
        self
    }

    /// The demos this compiler would attach for `trainset`.
    pub fn select(&self, trainset: &[Example]) -> Vec<Example> {
        if self.sample {
            sample_demos(trainset, self.k, DEMO_SAMPLE_SEED)
        } else {
            trainset.iter().take(self.k).cloned().collect()
        }
    }
}

#[async_trait]
impl Teleprompter for LabeledFewShot {
    async fn compile<P: Program>(
        &self,
        student: &P,
        _teacher: Option<&P>,
        trainset: &[Example],
    ) -> Result<P, CompileError> {
        let mut compiled = student.reset_copy();
        if self.k == 0 || trainset.is_empty() {
            return Ok(compiled);
        }

        let demos = self.select(trainset);
        for predictor in compiled.predictors_mut() {
            predictor.demos = demos.clone();
        }
        Ok(compiled)
    }
}
