//! Embedding index over a corpus, searched by cosine similarity.
//!
//! [`EmbeddingIndex`] pairs a [`Corpus`] snapshot with one vector per record,
//! computed once at build time. There is no incremental update: a changed
//! corpus needs a fresh build, and the index remembers which corpus version
//! it was built from so that stale use can be rejected.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::corpus::Corpus;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::record::{RetrievalResult, ScoredRecord};

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Why `vector` cannot be scored, if it cannot.
///
/// Components must be finite and the squared norm must not overflow `f32`,
/// otherwise cosine similarity comes out as NaN.
fn vector_defect(vector: &[f32]) -> Option<&'static str> {
    if vector.iter().any(|x| !x.is_finite()) {
        return Some("non-finite component");
    }
    if !vector.iter().map(|x| x * x).sum::<f32>().is_finite() {
        return Some("magnitude overflows f32");
    }
    None
}

/// An immutable corpus snapshot with one embedding per record.
///
/// `vectors[i]` always corresponds to `corpus[i]`.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    corpus: Arc<Corpus>,
    vectors: Vec<Vec<f32>>,
    dimensions: usize,
}

impl EmbeddingIndex {
    /// Embed every record's searchable text and build the index.
    ///
    /// Records are embedded with one [`EmbeddingProvider::embed_batch`] call;
    /// the index is only returned once every record has a usable vector.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the provider fails, returns
    /// vectors of differing (or zero) length, or returns a vector with a
    /// non-finite component or an overflowing magnitude.
    pub async fn build(corpus: Arc<Corpus>, provider: &dyn EmbeddingProvider) -> Result<Self> {
        let texts: Vec<String> = corpus.iter().map(|r| r.searchable_text()).collect();
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = provider.embed_batch(&inputs).await.inspect_err(|e| {
            error!(corpus.version = corpus.version(), error = %e, "index build failed");
        })?;
        if vectors.len() != inputs.len() {
            return Err(RagError::embedding(
                provider.name(),
                format!("returned {} vectors for {} records", vectors.len(), inputs.len()),
            ));
        }

        let dimensions = match vectors.first() {
            Some(first) => first.len(),
            None => provider.dimensions(),
        };
        if !vectors.is_empty() && dimensions == 0 {
            return Err(RagError::embedding(provider.name(), "provider returned an empty vector"));
        }
        if let Some((position, bad)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dimensions)
        {
            error!(position, expected = dimensions, actual = bad.len(), "inconsistent dimensionality");
            return Err(RagError::embedding(
                provider.name(),
                format!(
                    "inconsistent dimensionality: record {position} has {} dimensions, expected {dimensions}",
                    bad.len()
                ),
            ));
        }

        if let Some((position, defect)) =
            vectors.iter().enumerate().find_map(|(i, v)| vector_defect(v).map(|d| (i, d)))
        {
            error!(position, defect, "unusable embedding");
            return Err(RagError::embedding(
                provider.name(),
                format!("record {position} has an unusable embedding: {defect}"),
            ));
        }

        info!(
            corpus.version = corpus.version(),
            record_count = corpus.len(),
            dimensions,
            "built embedding index"
        );
        Ok(Self { corpus, vectors, dimensions })
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Version of the corpus this index was built from.
    pub fn corpus_version(&self) -> u64 {
        self.corpus.version()
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    /// Fail with [`RagError::StaleIndexError`] unless this index was built
    /// from the corpus at `live_version`.
    pub fn ensure_fresh(&self, live_version: u64) -> Result<()> {
        if self.corpus_version() != live_version {
            return Err(RagError::StaleIndexError {
                index_version: self.corpus_version(),
                corpus_version: live_version,
            });
        }
        Ok(())
    }

    /// Rank every record against `query_vector`, returning the best `k`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if `query_vector` does not match
    /// the index dimensionality or cannot be scored.
    pub fn search_vector(&self, query_vector: &[f32], k: usize) -> Result<RetrievalResult> {
        if self.is_empty() {
            return Ok(RetrievalResult::empty());
        }
        if query_vector.len() != self.dimensions {
            return Err(RagError::embedding(
                "query",
                format!(
                    "query vector has {} dimensions, index has {}",
                    query_vector.len(),
                    self.dimensions
                ),
            ));
        }

        if let Some(defect) = vector_defect(query_vector) {
            return Err(RagError::embedding("query", format!("unusable query vector: {defect}")));
        }

        let scored: Vec<ScoredRecord> = self
            .corpus
            .iter()
            .zip(&self.vectors)
            .map(|(record, vector)| ScoredRecord {
                record: record.clone(),
                score: cosine_similarity(query_vector, vector),
            })
            .collect();
        debug!(candidates = scored.len(), k, "scored index");
        Ok(RetrievalResult::ranked(scored, k))
    }
}
