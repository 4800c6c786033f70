//! Data types for catalog records and retrieval results.

use serde::{Deserialize, Serialize};

/// A single catalog entry.
///
/// Records are immutable once loaded into a [`Corpus`](crate::Corpus). The
/// `id` is the record's position in that corpus and is assigned on load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Record {
    /// Stable position of the record in its corpus.
    pub id: usize,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub mood: String,
    pub year: i32,
}

impl Record {
    /// Create a record. The `id` is overwritten when the record is loaded
    /// into a corpus.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: impl Into<String>,
        mood: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            id: 0,
            title: title.into(),
            author: author.into(),
            genre: genre.into(),
            mood: mood.into(),
            year,
        }
    }

    /// The deterministic text form fed to the embedding provider.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} by {} | {} | {} | {}",
            self.title, self.author, self.genre, self.mood, self.year
        )
    }

    /// The five attribute values in fixed order: title, author, genre, mood, year.
    pub fn attribute_values(&self) -> [String; 5] {
        [
            self.title.clone(),
            self.author.clone(),
            self.genre.clone(),
            self.mood.clone(),
            self.year.to_string(),
        ]
    }

    /// Whether two records name the same work (case-insensitive title and author).
    pub fn same_work(&self, other: &Record) -> bool {
        self.title.eq_ignore_ascii_case(&other.title)
            && self.author.eq_ignore_ascii_case(&other.author)
    }
}

/// A retrieved [`Record`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredRecord {
    /// The retrieved record.
    pub record: Record,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}

/// Ranked retrieval output.
///
/// Entries are sorted by descending score; ties keep ascending corpus order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct RetrievalResult {
    entries: Vec<ScoredRecord>,
}

impl RetrievalResult {
    /// Build a result from unordered entries, sorting them by descending
    /// score with ascending record id as the tie-breaker, then truncating to `k`.
    ///
    /// NaN scores rank below every other score.
    pub fn ranked(mut entries: Vec<ScoredRecord>, k: usize) -> Self {
        fn rank_key(score: f32) -> f32 {
            if score.is_nan() { f32::NEG_INFINITY } else { score }
        }
        entries.sort_by(|a, b| {
            rank_key(b.score)
                .total_cmp(&rank_key(a.score))
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        entries.truncate(k);
        Self { entries }
    }

    /// Build a result that keeps the given order as-is.
    pub fn from_ordered(entries: Vec<ScoredRecord>) -> Self {
        Self { entries }
    }

    /// An empty result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The ranked entries.
    pub fn entries(&self) -> &[ScoredRecord] {
        &self.entries
    }

    /// Iterate over the retrieved records in rank order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|e| &e.record)
    }

    pub fn into_entries(self) -> Vec<ScoredRecord> {
        self.entries
    }

    /// A compact, serializable view for telemetry.
    pub fn summary(&self) -> RetrievalSummary {
        RetrievalSummary {
            count: self.entries.len(),
            ids: self.entries.iter().map(|e| e.record.id).collect(),
            titles: self.entries.iter().map(|e| e.record.title.clone()).collect(),
            top_score: self.entries.first().map(|e| e.score),
        }
    }
}

/// Summary of a [`RetrievalResult`] sent along with request traces.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RetrievalSummary {
    pub count: usize,
    pub ids: Vec<usize>,
    pub titles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_score: Option<f32>,
}
