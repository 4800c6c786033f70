//! Retrieval engine for the songrag catalog question-answering core.
//!
//! This crate provides:
//! - An immutable, versioned catalog [`Corpus`] and the [`CorpusStore`] that publishes it
//! - The [`EmbeddingProvider`] trait with a closure adapter and a hashing embedder
//! - A build-once [`EmbeddingIndex`] searched by cosine similarity
//! - A [`Retriever`] for semantic, exact-title and attribute search
//! - [`RagEngine`], which rebuilds and swaps indexes atomically
//! - Mood and favorites based recommendations

pub mod config;
pub mod corpus;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod index;
pub mod recommend;
pub mod record;
pub mod retriever;

pub use config::{RetrieverConfig, RetrieverConfigBuilder};
pub use corpus::{Corpus, CorpusStore};
pub use embedding::{EmbeddingProvider, FnEmbedder, HashEmbedder};
pub use engine::{RagEngine, RagEngineBuilder};
pub use error::{RagError, Result};
pub use index::{EmbeddingIndex, cosine_similarity};
pub use recommend::{FavoritesStore, InMemoryFavoritesStore, Recommender, SIMILAR_MOODS};
pub use record::{Record, RetrievalResult, RetrievalSummary, ScoredRecord};
pub use retriever::{FilterField, RetrievalMode, Retriever, is_valid_query};
