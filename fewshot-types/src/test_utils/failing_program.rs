//! FailingProgram: every run fails.

use crate::error::ProgramError;
use crate::example::Example;
use crate::program::{Predictor, Program, ProgramOutput};
use async_trait::async_trait;

/// A single-predictor program whose `forward` always returns
/// [`ProgramError::Model`]. Used to exercise failure sentinels.
#[derive(Debug, Clone)]
pub struct FailingProgram {
    predictor: Predictor,
}

impl FailingProgram {
    /// Create a failing program with a predictor named `broken`.
    pub fn new() -> Self {
        Self {
            predictor: Predictor::new("broken"),
        }
    }
}

impl Default for FailingProgram {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Program for FailingProgram {
    async fn forward(&self, _example: &Example) -> Result<ProgramOutput, ProgramError> {
        Err(ProgramError::Model("model unavailable".into()))
    }

    fn predictors(&self) -> Vec<&Predictor> {
        vec![&self.predictor]
    }

    fn predictors_mut(&mut self) -> Vec<&mut Predictor> {
        vec![&mut self.predictor]
    }
}
