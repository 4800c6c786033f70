//! Configuration for retrieval.

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Configuration parameters for the retriever.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrieverConfig {
    /// Number of results returned when the caller does not pass `k`.
    pub default_top_k: usize,
    /// Minimum similarity for a semantic hit to count in grounded search.
    pub similarity_threshold: f32,
    /// Score assigned to records found by the substring fallback.
    pub fallback_score: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self { default_top_k: 3, similarity_threshold: 0.1, fallback_score: 0.5 }
    }
}

impl RetrieverConfig {
    /// Create a new builder for constructing a [`RetrieverConfig`].
    pub fn builder() -> RetrieverConfigBuilder {
        RetrieverConfigBuilder::default()
    }

    /// Check that the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `default_top_k == 0`
    /// - `similarity_threshold` is outside `[-1, 1]`
    /// - `fallback_score` is outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if self.default_top_k == 0 {
            return Err(RagError::ConfigError("default_top_k must be greater than zero".to_string()));
        }
        if !(-1.0..=1.0).contains(&self.similarity_threshold) {
            return Err(RagError::ConfigError(format!(
                "similarity_threshold ({}) must be within [-1, 1]",
                self.similarity_threshold
            )));
        }
        if !(0.0..=1.0).contains(&self.fallback_score) {
            return Err(RagError::ConfigError(format!(
                "fallback_score ({}) must be within [0, 1]",
                self.fallback_score
            )));
        }
        Ok(())
    }
}

/// Builder for constructing a validated [`RetrieverConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrieverConfigBuilder {
    config: RetrieverConfig,
}

impl RetrieverConfigBuilder {
    /// Set the number of results returned by default.
    pub fn default_top_k(mut self, k: usize) -> Self {
        self.config.default_top_k = k;
        self
    }

    /// Set the minimum similarity for grounded search.
    pub fn similarity_threshold(mut self, threshold: f32) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Set the score given to substring fallback matches.
    pub fn fallback_score(mut self, score: f32) -> Self {
        self.config.fallback_score = score;
        self
    }

    /// Build the [`RetrieverConfig`], validating that parameters are consistent.
    pub fn build(self) -> Result<RetrieverConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
