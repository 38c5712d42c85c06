use crate::labeled::LabeledFewShot;
use crate::sample::{DEMO_SAMPLE_SEED, sample_demos};
use async_trait::async_trait;
use fewshot_types::error::CompileError;
use fewshot_types::example::Example;
use fewshot_types::metric::Metric;
use fewshot_types::program::{Program, TraceStep};
use fewshot_types::teleprompter::Teleprompter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Static configuration for a BootstrapFewShot instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Maximum number of training examples whose traces become demos.
    pub max_bootstrapped_demos: usize,
    /// Cap on total demos per predictor; the room left after bootstrapped
    /// demos is filled with labeled examples. Also used to prime a teacher
    /// that has no demos.
    pub max_labeled_demos: usize,
    /// Passes over the training set while filling bootstrapped slots.
    pub max_rounds: usize,
    /// Minimum metric score for a trace to qualify. `None` accepts any
    /// score above zero.
    pub metric_threshold: Option<f64>,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            max_bootstrapped_demos: 4,
            max_labeled_demos: 16,
            max_rounds: 1,
            metric_threshold: None,
        }
    }
}

/// Bootstraps demonstrations by running a teacher program over the
/// training set and keeping the traces the metric accepts.
///
/// Training examples are visited in the order given, for up to
/// `max_rounds` passes, until `max_bootstrapped_demos` of them have
/// produced an accepted trace. Every step of an accepted trace becomes a
/// demo for the predictor that made it. Each student predictor then gets
/// its bootstrapped demos followed by labeled examples drawn from the
/// examples that were not bootstrapped, up to `max_labeled_demos` in total.
pub struct BootstrapFewShot {
    metric: Arc<dyn Metric>,
    config: BootstrapConfig,
}

impl BootstrapFewShot {
    /// Create a new bootstrapper with a metric and configuration.
    pub fn new(metric: Arc<dyn Metric>, config: BootstrapConfig) -> Self {
        Self { metric, config }
    }

    /// The configuration this bootstrapper runs with.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Whether a metric score qualifies a trace as a demonstration.
    fn accepts(&self, score: f64) -> bool {
        match self.config.metric_threshold {
            Some(threshold) => score >= threshold,
            None => score > 0.0,
        }
    }

    /// Resolve the teacher: the given one or a copy of the student, primed
    /// with labeled demos when it has none.
    async fn prepare_teacher<P: Program>(
        &self,
        student: &P,
        teacher: Option<&P>,
        trainset: &[Example],
    ) -> Result<P, CompileError> {
        let teacher = teacher.cloned().unwrap_or_else(|| student.clone());

        let student_names = predictor_names(student);
        let teacher_names = predictor_names(&teacher);
        if student_names != teacher_names {
            return Err(CompileError::InvalidConfig(format!(
                "teacher predictors {teacher_names:?} do not match student predictors {student_names:?}"
            )));
        }

        if !teacher.has_demos() && self.config.max_labeled_demos > 0 {
            return LabeledFewShot::new(self.config.max_labeled_demos)
                .compile(&teacher, None, trainset)
                .await;
        }
        Ok(teacher)
    }

    /// Run the teacher on one example. Returns the trace when the metric
    /// accepts the run.
    async fn bootstrap_one<P: Program>(
        &self,
        teacher: &P,
        index: usize,
        example: &Example,
    ) -> Option<Vec<TraceStep>> {
        // The example must not see itself as a demo.
        let mut teacher = teacher.clone();
        for predictor in teacher.predictors_mut() {
            predictor.demos.retain(|demo| demo != example);
        }

        let output = match teacher.forward(example).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(example = index, error = %e, "fewshot.bootstrap.program_failed");
                return None;
            }
        };
        match self
            .metric
            .score(example, &output.prediction, Some(output.trace.as_slice()))
        {
            Ok(score) if self.accepts(score) => Some(output.trace),
            Ok(score) => {
                tracing::debug!(example = index, score, "fewshot.bootstrap.rejected");
                None
            }
            Err(e) => {
                tracing::warn!(example = index, error = %e, "fewshot.bootstrap.metric_failed");
                None
            }
        }
    }
}

fn predictor_names<P: Program>(program: &P) -> Vec<String> {
    program.predictors().iter().map(|p| p.name.clone()).collect()
}

#[async_trait]
impl Teleprompter for BootstrapFewShot {
    async fn compile<P: Program>(
        &self,
        student: &P,
        teacher: Option<&P>,
        trainset: &[Example],
    ) -> Result<P, CompileError> {
        let teacher = self.prepare_teacher(student, teacher, trainset).await?;
        let max_bootstrapped = self.config.max_bootstrapped_demos;

        let mut name_to_demos: HashMap<String, Vec<Example>> = HashMap::new();
        let mut bootstrapped = vec![false; trainset.len()];
        let mut count = 0usize;

        'rounds: for round in 0..self.config.max_rounds {
            for (index, example) in trainset.iter().enumerate() {
                if count >= max_bootstrapped {
                    break 'rounds;
                }
                if bootstrapped[index] {
                    continue;
                }
                if let Some(trace) = self.bootstrap_one(&teacher, index, example).await {
                    for step in &trace {
                        name_to_demos
                            .entry(step.predictor.clone())
                            .or_default()
                            .push(step.to_demo());
                    }
                    bootstrapped[index] = true;
                    count += 1;
                    tracing::debug!(round, example = index, count, "fewshot.bootstrap.accepted");
                }
            }
        }

        let unbootstrapped: Vec<Example> = trainset
            .iter()
            .zip(&bootstrapped)
            .filter(|(_, done)| !**done)
            .map(|(example, _)| example.clone())
            .collect();

        let mut compiled = student.reset_copy();
        for predictor in compiled.predictors_mut() {
            let mut demos: Vec<Example> = name_to_demos
                .remove(&predictor.name)
                .unwrap_or_default()
                .into_iter()
                .take(max_bootstrapped)
                .collect();
            let room = self.config.max_labeled_demos.saturating_sub(demos.len());
            demos.extend(sample_demos(&unbootstrapped, room, DEMO_SAMPLE_SEED));
            predictor.demos = demos;
        }

        tracing::debug!(
            bootstrapped = count,
            examples = trainset.len(),
            demos = ?compiled.demo_counts(),
            "fewshot.bootstrap.complete"
        );
        Ok(compiled)
    }
}
