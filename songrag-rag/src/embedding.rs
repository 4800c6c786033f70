//! Embedding provider trait for generating vector embeddings from text.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::error::{RagError, Result};

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding model behind a unified async
/// interface. The index treats the provider as a black box: it never assumes
/// determinism, only that every vector of one build has the same length.
/// Index builds go through [`embed_batch`](EmbeddingProvider::embed_batch),
/// whose default runs [`embed`](EmbeddingProvider::embed) concurrently for
/// every input; backends that support native batching should override it.
///
/// # Example
///
/// ```rust,ignore
/// use songrag_rag::EmbeddingProvider;
///
/// let provider = HashEmbedder::new(64);
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        try_join_all(texts.iter().map(|text| self.embed(text))).await
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Short name used in error messages and logs.
    fn name(&self) -> &str {
        "embedding"
    }
}

/// Adapts a plain synchronous function into an [`EmbeddingProvider`].
///
/// The function may fail by returning `Err(message)`, which surfaces as
/// [`RagError::EmbeddingError`].
pub struct FnEmbedder<F> {
    embed_fn: F,
    dimensions: usize,
}

impl<F> FnEmbedder<F>
where
    F: Fn(&str) -> std::result::Result<Vec<f32>, String> + Send + Sync,
{
    /// Wrap `embed_fn`, which is expected to produce `dimensions`-length vectors.
    pub fn new(dimensions: usize, embed_fn: F) -> Self {
        Self { embed_fn, dimensions }
    }
}

impl<F> fmt::Debug for FnEmbedder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnEmbedder").field("dimensions", &self.dimensions).finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> EmbeddingProvider for FnEmbedder<F>
where
    F: Fn(&str) -> std::result::Result<Vec<f32>, String> + Send + Sync,
{
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (self.embed_fn)(text).map_err(|message| RagError::embedding(self.name(), message))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "fn"
    }
}

/// A deterministic bag-of-words embedder based on feature hashing.
///
/// Each lowercase alphanumeric token is hashed into one of `dimensions`
/// buckets and the result is L2-normalized. Texts that share tokens get a
/// positive cosine similarity. Intended for tests and offline development;
/// it carries no semantic knowledge beyond lexical overlap.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];
        let lowered = text.to_lowercase();
        for token in lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let bucket = (hasher.finish() % self.dimensions as u64) as usize;
            embedding[bucket] += 1.0;
        }
        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            embedding.iter_mut().for_each(|x| *x /= norm);
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_embedder_is_deterministic_and_normalized() {
        let embedder = HashEmbedder::new(32);
        let a = embedder.embed("Imagine by John Lennon").await.unwrap();
        let b = embedder.embed("Imagine by John Lennon").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn hash_embedder_returns_zero_vector_for_blank_text() {
        let embedder = HashEmbedder::new(8);
        let v = embedder.embed("  ?! ").await.unwrap();
        assert!(v.iter().all(|x| *x == 0.0));
    }

    #[tokio::test]
    async fn fn_embedder_maps_failures_to_embedding_error() {
        let embedder = FnEmbedder::new(2, |text: &str| {
            if text.is_empty() { Err("empty input".to_string()) } else { Ok(vec![1.0, 0.0]) }
        });
        assert_eq!(embedder.embed("x").await.unwrap(), vec![1.0, 0.0]);
        let err = embedder.embed("").await.unwrap_err();
        assert!(matches!(err, RagError::EmbeddingError { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn default_batch_preserves_order() {
        let embedder = FnEmbedder::new(1, |text: &str| Ok(vec![text.len() as f32]));
        let out = embedder.embed_batch(&["a", "abc", "ab"]).await.unwrap();
        assert_eq!(out, vec![vec![1.0], vec![3.0], vec![2.0]]);
    }
}
