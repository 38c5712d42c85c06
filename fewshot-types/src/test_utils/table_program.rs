//! TableProgram: answers from a fixed lookup table.

use crate::error::ProgramError;
use crate::example::{Example, Prediction};
use crate::program::{Predictor, Program, ProgramOutput, TraceStep};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A program that looks the `question` input up in a table and predicts
/// the stored `answer`. Unknown questions fail with
/// [`ProgramError::Predictor`].
///
/// Every predictor in the chain records one trace step per run, so a
/// multi-predictor table program bootstraps one demo per predictor.
#[derive(Debug, Clone)]
pub struct TableProgram {
    predictors: Vec<Predictor>,
    answers: Arc<HashMap<String, Value>>,
}

impl TableProgram {
    /// Create a table program with a single predictor named `answer`.
    pub fn new() -> Self {
        Self::with_predictors(["answer"])
    }

    /// Create a table program with one predictor per name, called in order.
    pub fn with_predictors<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            predictors: names.into_iter().map(Predictor::new).collect(),
            answers: Arc::new(HashMap::new()),
        }
    }

    /// Add a known question/answer pair.
    pub fn answer(mut self, question: impl Into<String>, answer: impl Into<Value>) -> Self {
        Arc::make_mut(&mut self.answers).insert(question.into(), answer.into());
        self
    }

    /// Add every example's `question` → `answer` pair.
    pub fn answering(mut self, examples: &[Example]) -> Self {
        let table = Arc::make_mut(&mut self.answers);
        for ex in examples {
            if let (Some(q), Some(a)) = (ex.get_str("question"), ex.get("answer")) {
                table.insert(q.to_owned(), a.clone());
            }
        }
        self
    }
}

impl Default for TableProgram {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Program for TableProgram {
    async fn forward(&self, example: &Example) -> Result<ProgramOutput, ProgramError> {
        let question = example
            .get_str("question")
            .ok_or_else(|| ProgramError::InvalidInput("question".into()))?;
        let last = self.predictors.last().map(|p| p.name.clone()).unwrap_or_default();
        let answer = self
            .answers
            .get(question)
            .cloned()
            .ok_or_else(|| ProgramError::Predictor {
                predictor: last,
                message: format!("no answer for {question}"),
            })?;

        let prediction = Prediction::new().with("answer", answer);
        let trace = self
            .predictors
            .iter()
            .map(|p| TraceStep::new(p.name.clone(), example.inputs(), prediction.clone()))
            .collect();
        Ok(ProgramOutput::new(prediction).with_trace(trace))
    }

    fn predictors(&self) -> Vec<&Predictor> {
        self.predictors.iter().collect()
    }

    fn predictors_mut(&mut self) -> Vec<&mut Predictor> {
        self.predictors.iter_mut().collect()
    }
}
