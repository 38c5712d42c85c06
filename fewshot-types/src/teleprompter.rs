//! The Teleprompter protocol: how demonstrations get attached to a program.

use crate::{error::CompileError, example::Example, program::Program};
use async_trait::async_trait;

/// Protocol ④: Compilation
///
/// A teleprompter takes a student program and a training set and returns
/// a new copy of the student with demonstrations attached to its
/// predictors. The student itself is never modified.
///
/// Implementations MUST be deterministic for identical inputs (including
/// any seeds in their configuration) so that searches are reproducible.
///
/// Implementations:
/// - `LabeledFewShot`: sample labeled examples directly
/// - `BootstrapFewShot`: run a teacher and keep traces the metric accepts
/// - `RandomSearch`: try many of the above and keep the best
#[async_trait]
pub trait Teleprompter: Send + Sync {
    /// Compile `student` against `trainset`.
    ///
    /// `teacher` is the program whose runs produce bootstrapped
    /// demonstrations. `None` means "use the student". Teleprompters that
    /// do not run programs ignore it.
    async fn compile<P: Program>(
        &self,
        student: &P,
        teacher: Option<&P>,
        trainset: &[Example],
    ) -> Result<P, CompileError>;
}
