#![deny(missing_docs)]
//! Demonstration compilers: the building blocks optimizers choose between.
//!
//! Implements `fewshot_types::Teleprompter` twice:
//!
//! - [`LabeledFewShot`] attaches labeled training examples as they are.
//!   No program runs.
//! - [`BootstrapFewShot`] runs a teacher program over the training set and
//!   keeps the traces the metric accepts, topping up with labeled examples.
//!
//! Both are deterministic: sampling uses a fixed-seed generator, so the
//! same inputs always produce the same demonstrations.

mod bootstrap;
mod labeled;
mod sample;

pub use bootstrap::{BootstrapConfig, BootstrapFewShot};
pub use labeled::LabeledFewShot;
pub use sample::{DEMO_SAMPLE_SEED, sample_demos};
