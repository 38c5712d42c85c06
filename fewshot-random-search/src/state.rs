use crate::robustness::{RobustnessStat, top_k_robustness};
use crate::strategy::CandidateStrategy;
use crate::tracker::BestTracker;
use fewshot_types::evaluator::ScoreRecord;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    /// Seed the candidate was built from.
    pub seed: i64,
    /// How its demonstrations were chosen.
    pub strategy: CandidateStrategy,
    /// Demonstrations per predictor.
    pub demo_counts: Vec<usize>,
    /// Its validation score.
    pub record: ScoreRecord,
}

/// What changed when a candidate was observed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// The candidate became the best so far.
    pub new_best: bool,
    /// Running maximum score, this candidate included.
    pub max_score: f64,
}

/// Everything a search has learned so far.
///
/// Candidates are folded in one at a time through [`observe`](Self::observe),
/// in seed order. The running maximum never decreases.
#[derive(Debug)]
pub struct SearchState<P> {
    candidates: Vec<CandidateRecord>,
    max_score: Option<f64>,
    best: BestTracker<P>,
}

impl<P> Default for SearchState<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> SearchState<P> {
    /// An empty state.
    pub fn new() -> Self {
        Self {
            candidates: vec![],
            max_score: None,
            best: BestTracker::NoCandidateYet,
        }
    }

    /// Fold in a scored candidate.
    pub fn observe(&mut self, candidate: CandidateRecord, program: Arc<P>) -> Observation {
        let score = candidate.record.score;
        // f64::max ignores a NaN operand.
        let max_score = self.max_score.map_or(score, |m| m.max(score));
        self.max_score = Some(max_score);
        let new_best = self
            .best
            .offer(candidate.seed, score, max_score, program);
        self.candidates.push(candidate);
        Observation {
            new_best,
            max_score,
        }
    }

    /// Scored candidates in processing order.
    pub fn history(&self) -> &[CandidateRecord] {
        &self.candidates
    }

    /// Aggregate scores in processing order.
    pub fn scores(&self) -> Vec<f64> {
        self.candidates.iter().map(|c| c.record.score).collect()
    }

    /// Highest score so far.
    pub fn max_score(&self) -> Option<f64> {
        self.max_score
    }

    /// The best candidate so far.
    pub fn best(&self) -> &BestTracker<P> {
        &self.best
    }

    /// Top-K robustness over the candidates so far.
    pub fn robustness(&self) -> Vec<RobustnessStat> {
        top_k_robustness(self.candidates.iter().map(|c| &c.record))
    }

    /// Split into the history and the best candidate.
    pub fn into_parts(self) -> (Vec<CandidateRecord>, BestTracker<P>) {
        (self.candidates, self.best)
    }
}
