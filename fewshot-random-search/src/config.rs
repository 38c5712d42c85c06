use crate::error::SearchError;
use fewshot_teleprompt::BootstrapConfig;
use serde::{Deserialize, Serialize};

/// Configuration for [`RandomSearch`](crate::RandomSearch).
///
/// Every field has a default, so a partial document deserializes into a
/// complete configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSearchConfig {
    /// Upper bound on bootstrapped demos per predictor.
    pub max_bootstrapped_demos: usize,

    /// Lower bound on the sampled bootstrap size for randomized candidates.
    pub min_bootstrapped_demos: usize,

    /// Upper bound on labeled demos per predictor.
    pub max_labeled_demos: usize,

    /// Bootstrap passes over the training set.
    pub max_rounds: usize,

    /// Number of randomized candidates. The search always adds three
    /// fixed-strategy candidates on top.
    pub num_candidate_sets: usize,

    /// Examples evaluated at once when scoring a candidate.
    pub concurrency: usize,

    /// Minimum metric score for a bootstrap trace to be kept. `None` accepts
    /// any positive score.
    pub metric_threshold: Option<f64>,
}

impl Default for RandomSearchConfig {
    fn default() -> Self {
        Self {
            max_bootstrapped_demos: 4,
            min_bootstrapped_demos: 1,
            max_labeled_demos: 16,
            max_rounds: 1,
            num_candidate_sets: 16,
            concurrency: 6,
            metric_threshold: None,
        }
    }
}

impl RandomSearchConfig {
    /// Set the bootstrap size bounds.
    pub fn with_bootstrapped_demos(mut self, min: usize, max: usize) -> Self {
        self.min_bootstrapped_demos = min;
        self.max_bootstrapped_demos = max;
        self
    }

    /// Set the labeled demo cap.
    pub fn with_max_labeled_demos(mut self, max: usize) -> Self {
        self.max_labeled_demos = max;
        self
    }

    /// Set the number of randomized candidates.
    pub fn with_num_candidate_sets(mut self, n: usize) -> Self {
        self.num_candidate_sets = n;
        self
    }

    /// Set the evaluation concurrency.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the bootstrap acceptance threshold.
    pub fn with_metric_threshold(mut self, threshold: f64) -> Self {
        self.metric_threshold = Some(threshold);
        self
    }

    /// Set the number of bootstrap passes.
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    /// Total candidates a search evaluates: the randomized ones plus the
    /// zero-shot, labeled-only and unshuffled-bootstrap candidates.
    pub fn total_candidates(&self) -> usize {
        self.num_candidate_sets.saturating_add(3)
    }

    /// Reject configurations the search cannot run.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.concurrency == 0 {
            return Err(SearchError::InvalidConfig(
                "concurrency must be at least 1".into(),
            ));
        }
        if self.num_candidate_sets > 0 && self.min_bootstrapped_demos > self.max_bootstrapped_demos
        {
            return Err(SearchError::InvalidConfig(format!(
                "min_bootstrapped_demos={} exceeds max_bootstrapped_demos={}",
                self.min_bootstrapped_demos, self.max_bootstrapped_demos
            )));
        }
        if i64::try_from(self.num_candidate_sets).is_err() {
            return Err(SearchError::InvalidConfig(format!(
                "num_candidate_sets={} is too large",
                self.num_candidate_sets
            )));
        }
        if let Some(threshold) = self.metric_threshold.filter(|t| !t.is_finite()) {
            return Err(SearchError::InvalidConfig(format!(
                "metric_threshold must be finite, got {threshold}"
            )));
        }
        Ok(())
    }

    /// Bootstrap settings for a candidate keeping up to `max_bootstrapped`
    /// traces per predictor.
    pub(crate) fn bootstrap_config(&self, max_bootstrapped: usize) -> BootstrapConfig {
        BootstrapConfig {
            max_bootstrapped_demos: max_bootstrapped,
            max_labeled_demos: self.max_labeled_demos,
            max_rounds: self.max_rounds,
            metric_threshold: self.metric_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RandomSearchConfig::default();
        assert_eq!(config.max_bootstrapped_demos, 4);
        assert_eq!(config.min_bootstrapped_demos, 1);
        assert_eq!(config.max_labeled_demos, 16);
        assert_eq!(config.max_rounds, 1);
        assert_eq!(config.num_candidate_sets, 16);
        assert_eq!(config.concurrency, 6);
        assert_eq!(config.metric_threshold, None);
        assert_eq!(config.total_candidates(), 19);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_document_fills_defaults() {
        let config: RandomSearchConfig =
            serde_json::from_str(r#"{"num_candidate_sets": 5, "metric_threshold": 0.5}"#)
                .unwrap();
        assert_eq!(config.num_candidate_sets, 5);
        assert_eq!(config.metric_threshold, Some(0.5));
        assert_eq!(config.max_labeled_demos, 16);
    }

    #[test]
    fn min_above_max_is_rejected() {
        let config = RandomSearchConfig::default().with_bootstrapped_demos(5, 2);
        assert!(matches!(
            config.validate(),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn min_above_max_is_fine_without_randomized_candidates() {
        let config = RandomSearchConfig::default()
            .with_bootstrapped_demos(5, 2)
            .with_num_candidate_sets(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let config = RandomSearchConfig::default().with_concurrency(0);
        assert!(matches!(
            config.validate(),
            Err(SearchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let config = RandomSearchConfig::default().with_metric_threshold(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn bootstrap_config_carries_shared_settings() {
        let config = RandomSearchConfig::default()
            .with_max_labeled_demos(3)
            .with_max_rounds(2)
            .with_metric_threshold(0.7);
        let bootstrap = config.bootstrap_config(2);
        assert_eq!(bootstrap.max_bootstrapped_demos, 2);
        assert_eq!(bootstrap.max_labeled_demos, 3);
        assert_eq!(bootstrap.max_rounds, 2);
        assert_eq!(bootstrap.metric_threshold, Some(0.7));
    }
}
