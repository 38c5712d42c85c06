use std::sync::Arc;

/// The best candidate seen so far.
///
/// The first candidate offered is always taken, whatever its score. After
/// that a candidate replaces the current best when its score is at least the
/// running maximum, so a later candidate wins a tie.
#[derive(Debug)]
pub enum BestTracker<P> {
    /// Nothing has been scored yet.
    NoCandidateYet,
    /// The current best candidate.
    HaveBest {
        /// Seed the candidate was built from.
        seed: i64,
        /// Its aggregate score.
        score: f64,
        /// The candidate program.
        program: Arc<P>,
    },
}

impl<P> Default for BestTracker<P> {
    fn default() -> Self {
        Self::NoCandidateYet
    }
}

impl<P> Clone for BestTracker<P> {
    fn clone(&self) -> Self {
        match self {
            Self::NoCandidateYet => Self::NoCandidateYet,
            Self::HaveBest {
                seed,
                score,
                program,
            } => Self::HaveBest {
                seed: *seed,
                score: *score,
                program: Arc::clone(program),
            },
        }
    }
}

impl<P> BestTracker<P> {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::NoCandidateYet
    }

    /// Offer a scored candidate. `running_max` is the maximum over every
    /// score seen, this one included. Returns whether it became the best.
    pub fn offer(&mut self, seed: i64, score: f64, running_max: f64, program: Arc<P>) -> bool {
        let take = match self {
            Self::NoCandidateYet => true,
            Self::HaveBest { .. } => score >= running_max,
        };
        if take {
            *self = Self::HaveBest {
                seed,
                score,
                program,
            };
        }
        take
    }

    /// Seed of the current best.
    pub fn seed(&self) -> Option<i64> {
        match self {
            Self::NoCandidateYet => None,
            Self::HaveBest { seed, .. } => Some(*seed),
        }
    }

    /// Score of the current best.
    pub fn score(&self) -> Option<f64> {
        match self {
            Self::NoCandidateYet => None,
            Self::HaveBest { score, .. } => Some(*score),
        }
    }

    /// The current best program.
    pub fn program(&self) -> Option<&Arc<P>> {
        match self {
            Self::NoCandidateYet => None,
            Self::HaveBest { program, .. } => Some(program),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_is_always_taken() {
        let mut tracker = BestTracker::new();
        assert!(tracker.offer(-3, f64::NAN, f64::NAN, Arc::new("zero")));
        assert_eq!(tracker.seed(), Some(-3));
    }

    #[test]
    fn lower_score_does_not_replace() {
        let mut tracker = BestTracker::new();
        tracker.offer(-3, 0.5, 0.5, Arc::new("a"));
        assert!(!tracker.offer(-2, 0.4, 0.5, Arc::new("b")));
        assert_eq!(tracker.seed(), Some(-3));
        assert_eq!(tracker.score(), Some(0.5));
    }

    #[test]
    fn tie_goes_to_later_candidate() {
        let mut tracker = BestTracker::new();
        tracker.offer(-3, 0.5, 0.5, Arc::new("a"));
        assert!(tracker.offer(-2, 0.5, 0.5, Arc::new("b")));
        assert_eq!(tracker.program().map(|p| **p), Some("b"));
    }

    #[test]
    fn nan_never_replaces_an_existing_best() {
        let mut tracker = BestTracker::new();
        tracker.offer(-3, 0.2, 0.2, Arc::new("a"));
        assert!(!tracker.offer(-2, f64::NAN, 0.2, Arc::new("b")));
        assert_eq!(tracker.seed(), Some(-3));
    }

    #[test]
    fn empty_tracker_has_nothing() {
        let tracker: BestTracker<()> = BestTracker::default();
        assert_eq!(tracker.seed(), None);
        assert_eq!(tracker.score(), None);
        assert!(tracker.program().is_none());
    }
}
