use crate::config::RandomSearchConfig;
use crate::error::SearchError;
use fewshot_types::example::Example;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seed of the candidate without demonstrations.
pub const ZERO_SHOT_SEED: i64 = -3;
/// Seed of the labeled-only candidate.
pub const LABELED_ONLY_SEED: i64 = -2;
/// Seed of the bootstrap candidate over the training set in its given order.
pub const UNSHUFFLED_BOOTSTRAP_SEED: i64 = -1;

/// How one candidate program gets its demonstrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateStrategy {
    /// No demonstrations.
    ZeroShot,
    /// Up to `max_labeled_demos` labeled training examples.
    LabeledOnly,
    /// Bootstrap with `max_bootstrapped_demos` over the unshuffled training set.
    UnshuffledBootstrap,
    /// Bootstrap with `size` demos over the training set shuffled by `seed`.
    RandomizedBootstrap {
        /// Shuffle and size seed.
        seed: u64,
        /// Sampled bootstrap size, within the configured bounds.
        size: usize,
    },
}

impl CandidateStrategy {
    /// Map a seed to its strategy.
    ///
    /// Seeds run from -3 up to (not including) `num_candidate_sets`; anything
    /// else is rejected with [`SearchError::InvalidSeed`].
    pub fn for_seed(seed: i64, config: &RandomSearchConfig) -> Result<Self, SearchError> {
        let invalid = || SearchError::InvalidSeed {
            seed,
            num_candidate_sets: config.num_candidate_sets,
        };
        match seed {
            ZERO_SHOT_SEED => Ok(Self::ZeroShot),
            LABELED_ONLY_SEED => Ok(Self::LabeledOnly),
            UNSHUFFLED_BOOTSTRAP_SEED => Ok(Self::UnshuffledBootstrap),
            _ => {
                let seed = u64::try_from(seed).map_err(|_| invalid())?;
                let in_range = usize::try_from(seed)
                    .map(|s| s < config.num_candidate_sets)
                    .unwrap_or(false);
                if !in_range {
                    return Err(invalid());
                }
                Ok(Self::RandomizedBootstrap {
                    seed,
                    size: sample_size(
                        seed,
                        config.min_bootstrapped_demos,
                        config.max_bootstrapped_demos,
                    ),
                })
            }
        }
    }

    /// The seed this strategy was derived from.
    pub fn seed(&self) -> i64 {
        match self {
            Self::ZeroShot => ZERO_SHOT_SEED,
            Self::LabeledOnly => LABELED_ONLY_SEED,
            Self::UnshuffledBootstrap => UNSHUFFLED_BOOTSTRAP_SEED,
            Self::RandomizedBootstrap { seed, .. } => i64::try_from(*seed).unwrap_or(i64::MAX),
        }
    }
}

impl fmt::Display for CandidateStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroShot => f.write_str("zero_shot"),
            Self::LabeledOnly => f.write_str("labeled_only"),
            Self::UnshuffledBootstrap => f.write_str("unshuffled_bootstrap"),
            Self::RandomizedBootstrap { seed, size } => {
                write!(f, "randomized_bootstrap(seed={seed}, size={size})")
            }
        }
    }
}

/// Seeds a search visits, in order: -3, -2, -1, then `0..num_candidate_sets`.
pub fn seeds(num_candidate_sets: usize) -> impl Iterator<Item = i64> {
    let end = i64::try_from(num_candidate_sets).unwrap_or(i64::MAX);
    ZERO_SHOT_SEED..end
}

/// Bootstrap size for a randomized candidate: uniform in `min..=max`, drawn
/// from a generator seeded with `seed` alone. A `max` below `min` yields `min`.
pub fn sample_size(seed: u64, min: usize, max: usize) -> usize {
    StdRng::seed_from_u64(seed).gen_range(min..=max.max(min))
}

/// A copy of `trainset` shuffled by a generator seeded with `seed`.
///
/// Uses its own generator, independent of the one in [`sample_size`].
pub fn shuffled(trainset: &[Example], seed: u64) -> Vec<Example> {
    let mut copy = trainset.to_vec();
    copy.shuffle(&mut StdRng::seed_from_u64(seed));
    copy
}
