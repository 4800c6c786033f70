//! Read-only search over a built [`EmbeddingIndex`].
//!
//! A [`Retriever`] is a cheap snapshot: it holds the index it was created
//! with and checks, on every call, that the live corpus has not moved on.
//! Retrievers come from [`RagEngine::retriever`](crate::RagEngine::retriever),
//! which always pairs an index with the store it was built from.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::RetrieverConfig;
use crate::corpus::CorpusStore;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::EmbeddingIndex;
use crate::record::{Record, RetrievalResult, ScoredRecord};

/// Record attribute that [`Retriever::filter_by`] can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Author,
    Genre,
    Mood,
}

impl FilterField {
    fn value_of(self, record: &Record) -> &str {
        match self {
            Self::Author => &record.author,
            Self::Genre => &record.genre,
            Self::Mood => &record.mood,
        }
    }
}

impl FromStr for FilterField {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "author" | "artist" => Ok(Self::Author),
            "genre" => Ok(Self::Genre),
            "mood" => Ok(Self::Mood),
            other => Err(RagError::InvalidArgument(format!("unknown filter field '{other}'"))),
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Author => "author",
            Self::Genre => "genre",
            Self::Mood => "mood",
        })
    }
}

/// How [`Retriever::retrieve`] interprets the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    Semantic,
    ExactTitle,
    ByAuthor,
    ByGenre,
    ByMood,
}

impl FromStr for RetrievalMode {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "semantic" => Ok(Self::Semantic),
            "exact_title" => Ok(Self::ExactTitle),
            "by_author" => Ok(Self::ByAuthor),
            "by_genre" => Ok(Self::ByGenre),
            "by_mood" => Ok(Self::ByMood),
            other => Err(RagError::InvalidArgument(format!("unknown retrieval mode '{other}'"))),
        }
    }
}

/// Whether `query` is worth searching: it must contain at least one
/// alphanumeric character.
pub fn is_valid_query(query: &str) -> bool {
    query.chars().any(char::is_alphanumeric)
}

/// Lowercase and collapse internal whitespace runs to a single space.
pub(crate) fn normalize_title(title: &str) -> String {
    title.split_whitespace().map(str::to_lowercase).collect::<Vec<_>>().join(" ")
}

fn ensure_k(k: usize) -> Result<()> {
    if k == 0 {
        return Err(RagError::InvalidArgument("k must be at least 1".to_string()));
    }
    Ok(())
}

/// Semantic, exact-title and attribute search over one index snapshot.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<CorpusStore>,
    index: Arc<EmbeddingIndex>,
    provider: Arc<dyn EmbeddingProvider>,
    config: RetrieverConfig,
}

impl fmt::Debug for Retriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retriever")
            .field("corpus_version", &self.index.corpus_version())
            .field("records", &self.index.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Create a retriever. `index` must have been built from `store`'s live
    /// corpus with `provider`; the freshness check relies on it, so only the
    /// engine hands retrievers out.
    pub(crate) fn new(
        store: Arc<CorpusStore>,
        index: Arc<EmbeddingIndex>,
        provider: Arc<dyn EmbeddingProvider>,
        config: RetrieverConfig,
    ) -> Self {
        Self { store, index, provider, config }
    }

    pub fn index(&self) -> &Arc<EmbeddingIndex> {
        &self.index
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    fn ensure_fresh(&self) -> Result<()> {
        self.index.ensure_fresh(self.store.version()).inspect_err(|e| {
            warn!(error = %e, "retrieval rejected against stale index");
        })
    }

    /// Rank all records by cosine similarity to `query` and return the top `k`.
    ///
    /// # Errors
    ///
    /// - [`RagError::InvalidArgument`] if `k == 0`
    /// - [`RagError::StaleIndexError`] if the corpus was replaced after the build
    /// - [`RagError::EmbeddingError`] if the query cannot be embedded
    pub async fn semantic_search(&self, query: &str, k: usize) -> Result<RetrievalResult> {
        ensure_k(k)?;
        self.ensure_fresh()?;
        if self.index.is_empty() {
            return Ok(RetrievalResult::empty());
        }

        let query_vector = self.provider.embed(query).await?;
        let result = self.index.search_vector(&query_vector, k)?;
        info!(k, result_count = result.len(), "semantic search completed");
        Ok(result)
    }

    /// Case-insensitive, whitespace-normalized title equality. Returns the
    /// first match in corpus order.
    pub fn exact_title_match(&self, title: &str) -> Result<Option<Record>> {
        self.ensure_fresh()?;
        let wanted = normalize_title(title);
        Ok(self.index.corpus().iter().find(|r| normalize_title(&r.title) == wanted).cloned())
    }

    /// Case-insensitive substring match against `field`, in corpus order.
    pub fn filter_by(&self, field: FilterField, value: &str) -> Result<Vec<Record>> {
        self.ensure_fresh()?;
        let needle = value.to_lowercase();
        let matches: Vec<Record> = self
            .index
            .corpus()
            .iter()
            .filter(|r| field.value_of(r).to_lowercase().contains(&needle))
            .cloned()
            .collect();
        debug!(%field, value, match_count = matches.len(), "filter completed");
        Ok(matches)
    }

    /// Semantic search that keeps only hits at or above the configured
    /// similarity threshold, falling back to substring search over all
    /// record fields when nothing clears it.
    pub async fn grounded_search(&self, query: &str, k: usize) -> Result<RetrievalResult> {
        let semantic = self.semantic_search(query, k).await?;
        let threshold = self.config.similarity_threshold;
        let kept: Vec<ScoredRecord> =
            semantic.into_entries().into_iter().filter(|e| e.score >= threshold).collect();
        if !kept.is_empty() {
            return Ok(RetrievalResult::from_ordered(kept));
        }

        let needle = query.trim().to_lowercase();
        let fallback: Vec<ScoredRecord> = self
            .index
            .corpus()
            .iter()
            .filter(|r| {
                format!("{} {} {} {} {}", r.title, r.author, r.genre, r.mood, r.year)
                    .to_lowercase()
                    .contains(&needle)
            })
            .take(k)
            .map(|r| ScoredRecord { record: r.clone(), score: self.config.fallback_score })
            .collect();
        info!(result_count = fallback.len(), "grounded search used substring fallback");
        Ok(RetrievalResult::from_ordered(fallback))
    }

    /// Dispatch to the search operation selected by `mode`.
    ///
    /// Non-semantic matches carry a score of 1.0 and keep corpus order; all
    /// modes return at most `k` entries.
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
        mode: RetrievalMode,
    ) -> Result<RetrievalResult> {
        ensure_k(k)?;
        let records = match mode {
            RetrievalMode::Semantic => {
                if !is_valid_query(query) {
                    return Err(RagError::InvalidArgument(format!(
                        "query '{query}' contains no searchable text"
                    )));
                }
                return self.semantic_search(query, k).await;
            }
            RetrievalMode::ExactTitle => self.exact_title_match(query)?.into_iter().collect(),
            RetrievalMode::ByAuthor => self.filter_by(FilterField::Author, query)?,
            RetrievalMode::ByGenre => self.filter_by(FilterField::Genre, query)?,
            RetrievalMode::ByMood => self.filter_by(FilterField::Mood, query)?,
        };
        Ok(RetrievalResult::from_ordered(
            records.into_iter().take(k).map(|record| ScoredRecord { record, score: 1.0 }).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_title_collapses_whitespace() {
        assert_eq!(normalize_title("  Bohemian   Rhapsody "), "bohemian rhapsody");
    }

    #[test]
    fn query_validation() {
        assert!(is_valid_query("Rock"));
        assert!(is_valid_query(" who wrote it? "));
        assert!(!is_valid_query(""));
        assert!(!is_valid_query("   "));
        assert!(!is_valid_query("?!@#"));
    }

    #[test]
    fn filter_field_parsing() {
        assert_eq!("Author".parse::<FilterField>().unwrap(), FilterField::Author);
        assert_eq!("mood".parse::<FilterField>().unwrap(), FilterField::Mood);
        let err = "tempo".parse::<FilterField>().unwrap_err();
        assert!(matches!(err, RagError::InvalidArgument(_)));
    }

    #[test]
    fn retrieval_mode_parsing() {
        assert_eq!("by_genre".parse::<RetrievalMode>().unwrap(), RetrievalMode::ByGenre);
        assert!("fuzzy".parse::<RetrievalMode>().is_err());
    }
}
