//! Error types for the `songrag-rag` crate.

use thiserror::Error;

/// Errors that can occur while indexing or searching the catalog.
#[derive(Debug, Error)]
pub enum RagError {
    /// The caller violated an operation contract (for example `k == 0`
    /// or an unknown filter field). Not retryable.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An error occurred during embedding generation, including a provider
    /// returning vectors of inconsistent dimensionality.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A search was attempted against an index built from a corpus that has
    /// since been replaced. The index must be rebuilt.
    #[error(
        "Stale index: built from corpus version {index_version}, live corpus is version {corpus_version}"
    )]
    StaleIndexError {
        /// The corpus version the index was built from.
        index_version: u64,
        /// The version of the live corpus.
        corpus_version: u64,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl RagError {
    /// Build an [`RagError::EmbeddingError`] for the named provider.
    pub fn embedding(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmbeddingError { provider: provider.into(), message: message.into() }
    }

    /// Whether a caller may reasonably retry the failed operation.
    ///
    /// Only embedding failures are retryable since the provider may be remote.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::EmbeddingError { .. })
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
