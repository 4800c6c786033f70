//! Stage 4: retrieval precision and recall.
//!
//! A record is relevant to a query when its searchable text shares at least
//! one significant token with the query. Significant tokens are longer than
//! `min_token_len` and not stop words.

use std::collections::HashSet;

use songrag_rag::{Corpus, Record, RetrievalResult};

use crate::text::{normalize, tokens};

/// Precision and recall of one retrieval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrievalMetrics {
    pub precision: f64,
    pub recall: f64,
    pub relevant_retrieved: usize,
    pub relevant_in_corpus: usize,
}

/// Relevance test built from a query.
#[derive(Debug, Clone)]
pub struct RelevanceJudge {
    query_tokens: HashSet<String>,
    min_token_len: usize,
}

impl RelevanceJudge {
    pub fn new(query: &str, min_token_len: usize, stop_words: &[String]) -> Self {
        let query_tokens = tokens(&normalize(query))
            .filter(|t| t.chars().count() > min_token_len)
            .filter(|t| !stop_words.iter().any(|s| s == t))
            .map(str::to_string)
            .collect();
        Self { query_tokens, min_token_len }
    }

    pub fn query_tokens(&self) -> &HashSet<String> {
        &self.query_tokens
    }

    pub fn is_relevant(&self, record: &Record) -> bool {
        if self.query_tokens.is_empty() {
            return false;
        }
        let text = normalize(&record.searchable_text());
        tokens(&text)
            .filter(|t| t.chars().count() > self.min_token_len)
            .any(|t| self.query_tokens.contains(t))
    }
}

/// Compute precision and recall of `retrieval` against the whole `corpus`.
///
/// Precision is 0.0 for an empty retrieval. Recall is 1.0 when the corpus
/// holds no relevant record at all, since nothing could have been missed.
pub fn retrieval_metrics(
    judge: &RelevanceJudge,
    retrieval: &RetrievalResult,
    corpus: &Corpus,
) -> RetrievalMetrics {
    let relevant_retrieved = retrieval.records().filter(|r| judge.is_relevant(r)).count();
    let relevant_in_corpus = corpus.iter().filter(|r| judge.is_relevant(r)).count();

    let precision = if retrieval.is_empty() {
        0.0
    } else {
        relevant_retrieved as f64 / retrieval.len() as f64
    };
    let recall = if relevant_in_corpus == 0 {
        1.0
    } else {
        (relevant_retrieved as f64 / relevant_in_corpus as f64).min(1.0)
    };

    RetrievalMetrics { precision, recall, relevant_retrieved, relevant_in_corpus }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DEFAULT_STOP_WORDS;
    use songrag_rag::ScoredRecord;

    fn stop_words() -> Vec<String> {
        DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect()
    }

    fn corpus() -> Corpus {
        Corpus::new(vec![
            Record::new("Imagine", "John Lennon", "Rock", "Peaceful", 1971),
            Record::new("Bohemian Rhapsody", "Queen", "Rock", "Epic", 1975),
            Record::new("Hello", "Adele", "Pop", "Sad", 2015),
        ])
    }

    fn retrieved(corpus: &Corpus, ids: &[usize]) -> RetrievalResult {
        RetrievalResult::from_ordered(
            ids.iter().map(|&id| ScoredRecord { record: corpus[id].clone(), score: 1.0 }).collect(),
        )
    }

    #[test]
    fn query_tokens_drop_short_and_stop_words() {
        let judge = RelevanceJudge::new("Who wrote an old rock hit?", 2, &stop_words());
        let mut t: Vec<&str> = judge.query_tokens().iter().map(String::as_str).collect();
        t.sort_unstable();
        assert_eq!(t, vec!["hit", "old", "rock", "wrote"]);
    }

    #[test]
    fn partial_retrieval_of_relevant_records() {
        let corpus = corpus();
        let judge = RelevanceJudge::new("rock songs", 2, &stop_words());
        let m = retrieval_metrics(&judge, &retrieved(&corpus, &[0, 2]), &corpus);
        assert_eq!(m.relevant_retrieved, 1);
        assert_eq!(m.relevant_in_corpus, 2);
        assert!((m.precision - 0.5).abs() < 1e-9);
        assert!((m.recall - 0.5).abs() < 1e-9);
    }

    #[test]
    fn recall_is_one_when_nothing_is_relevant() {
        let corpus = corpus();
        let judge = RelevanceJudge::new("jazz standards", 2, &stop_words());
        let m = retrieval_metrics(&judge, &retrieved(&corpus, &[1]), &corpus);
        assert_eq!(m.relevant_in_corpus, 0);
        assert_eq!(m.recall, 1.0);
        assert_eq!(m.precision, 0.0);
    }

    #[test]
    fn empty_retrieval_has_zero_precision() {
        let corpus = corpus();
        let judge = RelevanceJudge::new("Imagine", 2, &stop_words());
        let m = retrieval_metrics(&judge, &RetrievalResult::empty(), &corpus);
        assert_eq!(m.precision, 0.0);
        assert_eq!(m.recall, 0.0);
    }
}
