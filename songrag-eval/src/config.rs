//! Evaluator configuration, including the quality decision table cutoffs.

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::rules::DEFAULT_STOP_WORDS;

/// Cutoffs for the quality roll-up.
///
/// The decision table, applied top to bottom:
///
/// | label       | condition                                                         |
/// |-------------|-------------------------------------------------------------------|
/// | `excellent` | factuality ≥ `excellent_factuality` and a citation is present      |
/// | `good`      | factuality ≥ `good_factuality` and precision ≥ `good_precision`    |
/// | `fair`      | factuality ≥ `fair_factuality`                                     |
/// | `poor`      | otherwise                                                          |
///
/// A detected hallucination then caps the label at `fair`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub excellent_factuality: f64,
    pub good_factuality: f64,
    pub good_precision: f64,
    pub fair_factuality: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent_factuality: 0.8,
            good_factuality: 0.5,
            good_precision: 0.5,
            fair_factuality: 0.3,
        }
    }
}

impl QualityThresholds {
    fn validate(&self) -> Result<()> {
        let all = [
            ("excellent_factuality", self.excellent_factuality),
            ("good_factuality", self.good_factuality),
            ("good_precision", self.good_precision),
            ("fair_factuality", self.fair_factuality),
        ];
        if let Some((name, value)) = all.iter().find(|(_, v)| !(0.0..=1.0).contains(v)) {
            return Err(EvalError::ConfigError(format!("{name} ({value}) must be within [0, 1]")));
        }
        if self.excellent_factuality < self.good_factuality
            || self.good_factuality < self.fair_factuality
        {
            return Err(EvalError::ConfigError(format!(
                "quality cutoffs must be monotone: excellent ({}) >= good ({}) >= fair ({})",
                self.excellent_factuality, self.good_factuality, self.fair_factuality
            )));
        }
        Ok(())
    }
}

/// Configuration parameters for the response evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Factuality below this counts toward hallucination when the response
    /// asserts specific facts.
    pub hallucination_factuality_threshold: f64,
    pub quality: QualityThresholds,
    /// Query tokens must be longer than this to count for relevance.
    pub min_token_len: usize,
    /// Query tokens ignored when judging relevance.
    pub relevance_stop_words: Vec<String>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            hallucination_factuality_threshold: 0.3,
            quality: QualityThresholds::default(),
            min_token_len: 2,
            relevance_stop_words: DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect(),
        }
    }
}

impl EvaluatorConfig {
    /// Create a new builder for constructing an [`EvaluatorConfig`].
    pub fn builder() -> EvaluatorConfigBuilder {
        EvaluatorConfigBuilder::default()
    }

    /// Check that thresholds are in range and the quality cutoffs are monotone.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.hallucination_factuality_threshold) {
            return Err(EvalError::ConfigError(format!(
                "hallucination_factuality_threshold ({}) must be within [0, 1]",
                self.hallucination_factuality_threshold
            )));
        }
        self.quality.validate()
    }
}

/// Builder for constructing a validated [`EvaluatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct EvaluatorConfigBuilder {
    config: EvaluatorConfig,
}

impl EvaluatorConfigBuilder {
    /// Set the factuality threshold used by hallucination detection.
    pub fn hallucination_factuality_threshold(mut self, threshold: f64) -> Self {
        self.config.hallucination_factuality_threshold = threshold;
        self
    }

    /// Set the quality decision table cutoffs.
    pub fn quality(mut self, quality: QualityThresholds) -> Self {
        self.config.quality = quality;
        self
    }

    /// Set the minimum length (exclusive) for relevance tokens.
    pub fn min_token_len(mut self, len: usize) -> Self {
        self.config.min_token_len = len;
        self
    }

    /// Replace the relevance stop words.
    pub fn relevance_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.relevance_stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Build the [`EvaluatorConfig`], validating that parameters are consistent.
    pub fn build(self) -> Result<EvaluatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(EvaluatorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_monotone_cutoffs() {
        let quality = QualityThresholds { good_factuality: 0.9, ..QualityThresholds::default() };
        let err = EvaluatorConfig::builder().quality(quality).build().unwrap_err();
        assert!(err.to_string().contains("monotone"));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(EvaluatorConfig::builder().hallucination_factuality_threshold(1.2).build().is_err());
        let quality = QualityThresholds { good_precision: -0.5, ..QualityThresholds::default() };
        assert!(EvaluatorConfig::builder().quality(quality).build().is_err());
    }

    #[test]
    fn stop_words_can_be_replaced() {
        let config = EvaluatorConfig::builder().relevance_stop_words(["rock"]).build().unwrap();
        assert_eq!(config.relevance_stop_words, vec!["rock".to_string()]);
    }
}
