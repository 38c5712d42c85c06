#![deny(missing_docs)]
//! Random search over demonstration sets.
//!
//! [`RandomSearch`] tries a fixed budget of candidate programs, each a copy
//! of the student with demonstrations chosen a different way, scores every
//! candidate on a validation set, and keeps the best one:
//!
//! | Seed | Strategy | Demonstrations |
//! |------|----------|----------------|
//! | -3 | [`CandidateStrategy::ZeroShot`] | none |
//! | -2 | [`CandidateStrategy::LabeledOnly`] | labeled training examples |
//! | -1 | [`CandidateStrategy::UnshuffledBootstrap`] | bootstrapped, training order |
//! | 0..N | [`CandidateStrategy::RandomizedBootstrap`] | bootstrapped, shuffled, random count |
//!
//! Candidates are processed one at a time, in seed order. Each result is
//! folded into a [`SearchState`]: the [`BestTracker`] keeps the best
//! program so far, and once three candidates are scored the
//! [robustness](robustness) statistic reports how much a top-K ensemble
//! could gain. Both are reported through `tracing` and in the
//! [`SearchOutcome`].

mod config;
mod error;
mod policy;
pub mod robustness;
mod search;
mod state;
mod strategy;
mod tracker;

pub use config::RandomSearchConfig;
pub use error::SearchError;
pub use policy::CandidatePolicy;
pub use robustness::{RobustnessStat, TopK, average_of_max_per_entry, top_k_robustness};
pub use search::{RandomSearch, SearchOutcome, SearchRequest, SkippedCandidate};
pub use state::{CandidateRecord, Observation, SearchState};
pub use strategy::{
    CandidateStrategy, LABELED_ONLY_SEED, UNSHUFFLED_BOOTSTRAP_SEED, ZERO_SHOT_SEED, sample_size,
    seeds, shuffled,
};
pub use tracker::BestTracker;
