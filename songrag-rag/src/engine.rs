//! Retrieval engine orchestrator.
//!
//! The [`RagEngine`] owns the live [`CorpusStore`], the embedding provider
//! and the current [`EmbeddingIndex`]. Rebuilding produces a new index and
//! swaps it in atomically; retrievers handed out earlier keep the snapshot
//! they were created with and fail with [`RagError::StaleIndexError`] once
//! the corpus has moved on.
//!
//! # Example
//!
//! ```rust,ignore
//! use songrag_rag::{HashEmbedder, RagEngine, RetrievalMode, RetrieverConfig};
//!
//! let engine = RagEngine::builder()
//!     .records(records)
//!     .embedding_provider(Arc::new(HashEmbedder::new(256)))
//!     .config(RetrieverConfig::default())
//!     .build()
//!     .await?;
//!
//! let results = engine.retrieve("Who wrote Imagine?", 3, RetrievalMode::Semantic).await?;
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::config::RetrieverConfig;
use crate::corpus::CorpusStore;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::EmbeddingIndex;
use crate::record::{Record, RetrievalResult};
use crate::retriever::{RetrievalMode, Retriever};

/// Owns the corpus, the embedding provider and the published index.
pub struct RagEngine {
    config: RetrieverConfig,
    store: Arc<CorpusStore>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: RwLock<Arc<EmbeddingIndex>>,
}

impl RagEngine {
    /// Create a new [`RagEngineBuilder`].
    pub fn builder() -> RagEngineBuilder {
        RagEngineBuilder::default()
    }

    /// Return a reference to the retriever configuration.
    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    /// Return the store holding the live corpus.
    pub fn corpus_store(&self) -> &Arc<CorpusStore> {
        &self.store
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Snapshot of the currently published index.
    pub async fn index(&self) -> Arc<EmbeddingIndex> {
        self.index.read().await.clone()
    }

    /// A retriever bound to the currently published index.
    pub async fn retriever(&self) -> Retriever {
        Retriever::new(
            self.store.clone(),
            self.index().await,
            self.embedding_provider.clone(),
            self.config.clone(),
        )
    }

    /// Rebuild the index from the live corpus and publish it.
    ///
    /// The previous index stays published if the build fails. Publication
    /// never moves backwards: if an index for a newer corpus was published
    /// while this build ran, the new build is discarded and the published
    /// index is returned instead.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if embedding fails.
    pub async fn rebuild(&self) -> Result<Arc<EmbeddingIndex>> {
        let corpus = self.store.current().await;
        let version = corpus.version();
        let index = Arc::new(
            EmbeddingIndex::build(corpus, self.embedding_provider.as_ref()).await.inspect_err(
                |e| error!(corpus.version = version, error = %e, "index rebuild failed"),
            )?,
        );

        let mut published = self.index.write().await;
        if published.corpus_version() > version {
            warn!(
                corpus.version = version,
                published.version = published.corpus_version(),
                "discarded rebuilt index, a newer one is already published"
            );
            return Ok(published.clone());
        }
        *published = index.clone();
        info!(corpus.version = version, "published rebuilt index");
        Ok(index)
    }

    /// Replace the catalog and rebuild the index for it.
    ///
    /// If the rebuild fails, retrieval keeps failing with
    /// [`RagError::StaleIndexError`] until a later [`rebuild`](Self::rebuild)
    /// succeeds.
    pub async fn replace_corpus(&self, records: Vec<Record>) -> Result<Arc<EmbeddingIndex>> {
        self.store.replace(records).await;
        self.rebuild().await
    }

    /// Retrieve with the given mode against the current index.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        mode: RetrievalMode,
    ) -> Result<RetrievalResult> {
        self.retriever().await.retrieve(query, k, mode).await
    }

    /// Semantic search using the configured `default_top_k`.
    pub async fn search(&self, query: &str) -> Result<RetrievalResult> {
        self.retrieve(query, self.config.default_top_k, RetrievalMode::Semantic).await
    }
}

/// Builder for constructing a [`RagEngine`].
///
/// `embedding_provider` is required; `records` defaults to an empty catalog
/// and `config` to [`RetrieverConfig::default`].
#[derive(Default)]
pub struct RagEngineBuilder {
    config: Option<RetrieverConfig>,
    records: Vec<Record>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
}

impl RagEngineBuilder {
    /// Set the retriever configuration.
    pub fn config(mut self, config: RetrieverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the initial catalog.
    pub fn records(mut self, records: Vec<Record>) -> Self {
        self.records = records;
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Validate the configuration, build the initial index and return the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if the provider is missing or the
    /// configuration is invalid, and [`RagError::EmbeddingError`] if the
    /// initial build fails.
    pub async fn build(self) -> Result<RagEngine> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;

        let store = Arc::new(CorpusStore::new(self.records));
        let index =
            EmbeddingIndex::build(store.current().await, embedding_provider.as_ref()).await?;

        Ok(RagEngine { config, store, embedding_provider, index: RwLock::new(Arc::new(index)) })
    }
}
