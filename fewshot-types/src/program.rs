//! The Program protocol: a composition of predictors that can be run on
//! an example and carry demonstrations.

use crate::{
    error::ProgramError,
    example::{Example, Prediction},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A named slot inside a program that holds demonstrations.
///
/// How the demonstrations are used (prompt formatting, model choice) is up
/// to the [`Program`] that owns the predictor.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predictor {
    /// Stable name, unique within its program. Trace steps refer to
    /// predictors by this name.
    pub name: String,

    /// Demonstrations attached to this predictor.
    #[serde(default)]
    pub demos: Vec<Example>,
}

impl Predictor {
    /// Create a predictor with no demonstrations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            demos: vec![],
        }
    }

    /// Drop all demonstrations.
    pub fn reset(&mut self) {
        self.demos.clear();
    }
}

/// Record of one predictor call made while running a program.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    /// Name of the predictor that was called.
    pub predictor: String,
    /// What the predictor received.
    pub inputs: Map<String, Value>,
    /// What the predictor produced.
    pub outputs: Prediction,
}

impl TraceStep {
    /// Create a new trace step.
    pub fn new(predictor: impl Into<String>, inputs: Map<String, Value>, outputs: Prediction) -> Self {
        Self {
            predictor: predictor.into(),
            inputs,
            outputs,
        }
    }

    /// Turn this step into a bootstrapped demonstration: inputs followed by
    /// outputs, with the step's inputs marked as input keys.
    pub fn to_demo(&self) -> Example {
        let mut fields = self.inputs.clone();
        for (k, v) in &self.outputs.fields {
            fields.insert(k.clone(), v.clone());
        }
        Example {
            fields,
            input_keys: self.inputs.keys().cloned().collect(),
            augmented: true,
        }
    }
}

/// Output from running a program on one example.
#[non_exhaustive]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramOutput {
    /// The final prediction.
    pub prediction: Prediction,
    /// Every predictor call made, in call order.
    #[serde(default)]
    pub trace: Vec<TraceStep>,
}

impl ProgramOutput {
    /// Create an output with an empty trace.
    pub fn new(prediction: Prediction) -> Self {
        Self {
            prediction,
            trace: vec![],
        }
    }

    /// Attach a trace.
    pub fn with_trace(mut self, trace: Vec<TraceStep>) -> Self {
        self.trace = trace;
        self
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// THE TRAIT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Protocol ①: The Program
///
/// A trainable composition of predictors. Optimizers copy it, change the
/// demonstrations of its predictors, and run it over datasets.
///
/// The program is atomic from the outside: you send an example, you get a
/// prediction and a trace of every predictor call made along the way.
/// Everything inside (how many model calls, how demos become prompts) is
/// the implementation's concern.
///
/// `Clone` is required because every candidate an optimizer tries is an
/// independent copy of the student.
#[async_trait]
pub trait Program: Clone + Send + Sync + 'static {
    /// Run the program on the input fields of `example`.
    ///
    /// Implementations MUST NOT read label fields; evaluation and
    /// bootstrapping pass full examples for convenience.
    async fn forward(&self, example: &Example) -> Result<ProgramOutput, ProgramError>;

    /// The program's predictors, in a stable order.
    fn predictors(&self) -> Vec<&Predictor>;

    /// Mutable access to the program's predictors, in the same order as
    /// [`Program::predictors`].
    fn predictors_mut(&mut self) -> Vec<&mut Predictor>;

    /// A copy of this program with every predictor's demos cleared.
    fn reset_copy(&self) -> Self {
        let mut copy = self.clone();
        for predictor in copy.predictors_mut() {
            predictor.reset();
        }
        copy
    }

    /// Demonstration count per predictor, in predictor order.
    fn demo_counts(&self) -> Vec<usize> {
        self.predictors().iter().map(|p| p.demos.len()).collect()
    }

    /// Whether any predictor carries demonstrations.
    fn has_demos(&self) -> bool {
        self.predictors().iter().any(|p| !p.demos.is_empty())
    }
}
