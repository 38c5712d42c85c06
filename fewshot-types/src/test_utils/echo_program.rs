//! EchoProgram: copies an input field into the prediction.

use crate::error::ProgramError;
use crate::example::{Example, Prediction};
use crate::program::{Predictor, Program, ProgramOutput, TraceStep};
use async_trait::async_trait;

/// A single-predictor program that predicts `output_field` by copying the
/// example's `input_field`. Fails with [`ProgramError::InvalidInput`] when
/// the input is missing.
#[derive(Debug, Clone)]
pub struct EchoProgram {
    predictor: Predictor,
    input_field: String,
    output_field: String,
}

impl EchoProgram {
    /// Create an echo program with a predictor named `echo`.
    pub fn new(input_field: impl Into<String>, output_field: impl Into<String>) -> Self {
        Self {
            predictor: Predictor::new("echo"),
            input_field: input_field.into(),
            output_field: output_field.into(),
        }
    }
}

#[async_trait]
impl Program for EchoProgram {
    async fn forward(&self, example: &Example) -> Result<ProgramOutput, ProgramError> {
        let value = example
            .get(&self.input_field)
            .cloned()
            .ok_or_else(|| ProgramError::InvalidInput(self.input_field.clone()))?;
        let prediction = Prediction::new().with(self.output_field.clone(), value);
        let step = TraceStep::new(
            self.predictor.name.clone(),
            example.inputs(),
            prediction.clone(),
        );
        Ok(ProgramOutput::new(prediction).with_trace(vec![step]))
    }

    fn predictors(&self) -> Vec<&Predictor> {
        vec![&self.predictor]
    }

    fn predictors_mut(&mut self) -> Vec<&mut Predictor> {
        vec![&mut self.predictor]
    }
}
