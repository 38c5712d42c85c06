//! Top-K robustness: how well an ensemble of the best K candidates could do.
//!
//! For each K the K best-scoring candidates are taken, and for every
//! validation example the best of their per-example scores is kept. The
//! statistic is the mean of those maxima. A value well above the best
//! single score means the candidates are right on different examples.

use fewshot_types::evaluator::ScoreRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Candidates needed before robustness is reported.
pub const MIN_HISTORY: usize = 3;

/// Ensemble sizes robustness is computed for.
pub const TOP_K: [TopK; 6] = [
    TopK::K(1),
    TopK::K(2),
    TopK::K(3),
    TopK::K(5),
    TopK::K(8),
    TopK::All,
];

/// An ensemble size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopK {
    /// The best `K` candidates, or all of them when fewer exist.
    K(usize),
    /// Every candidate.
    All,
}

impl TopK {
    /// How many of `available` candidates this size takes.
    pub fn take(self, available: usize) -> usize {
        match self {
            Self::K(k) => k.min(available),
            Self::All => available,
        }
    }
}

impl fmt::Display for TopK {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::K(k) => write!(f, "{k}"),
            Self::All => f.write_str("all"),
        }
    }
}

/// Robustness for one ensemble size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustnessStat {
    /// Ensemble size.
    pub k: TopK,
    /// Candidates that contributed per-example scores.
    pub candidates: usize,
    /// Mean over examples of the best per-example score.
    pub average_of_max_per_entry: f64,
}

/// Robustness over every size in [`TOP_K`].
///
/// Empty until at least [`MIN_HISTORY`] records exist. Records are ranked by
/// aggregate score, highest first, with equal scores kept in the order given
/// and NaN scores ranked last. A size whose top records all lack per-example
/// scores is left out.
pub fn top_k_robustness<'a, I>(records: I) -> Vec<RobustnessStat>
where
    I: IntoIterator<Item = &'a ScoreRecord>,
{
    let mut ranked: Vec<&ScoreRecord> = records.into_iter().collect();
    if ranked.len() < MIN_HISTORY {
        return vec![];
    }
    ranked.sort_by(|a, b| descending(a.score, b.score));

    TOP_K
        .iter()
        .filter_map(|&k| {
            let top = &ranked[..k.take(ranked.len())];
            let candidates = top.iter().filter(|r| r.has_subscores()).count();
            average_of_max_per_entry(top.iter().copied()).map(|average| RobustnessStat {
                k,
                candidates,
                average_of_max_per_entry: average,
            })
        })
        .collect()
}

/// Mean over example positions of the best per-example score.
///
/// Records without per-example scores are ignored. Positions beyond the
/// shortest remaining record are ignored. `None` when nothing is left.
pub fn average_of_max_per_entry<'a, I>(records: I) -> Option<f64>
where
    I: IntoIterator<Item = &'a ScoreRecord>,
{
    let retained: Vec<&[f64]> = records
        .into_iter()
        .filter(|r| r.has_subscores())
        .map(|r| r.subscores.as_slice())
        .collect();
    let positions = retained.iter().map(|s| s.len()).min()?;
    if positions == 0 {
        return None;
    }

    let total: f64 = (0..positions)
        .map(|i| {
            retained
                .iter()
                .map(|s| s[i])
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .sum();
    Some(total / positions as f64)
}

fn descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
