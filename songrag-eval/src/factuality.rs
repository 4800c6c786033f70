//! Stage 2: factuality scoring.

use songrag_rag::RetrievalResult;

use crate::text::{contains_phrase, normalize};

const ATTRIBUTES_PER_RECORD: usize = 5;

/// Fraction of the retrieved records' attribute values (title, author,
/// genre, mood, year) that the response quotes, clamped to `[0, 1]`.
///
/// An empty retrieval scores 0.0.
pub fn factuality_score(response: &str, retrieval: &RetrievalResult) -> f64 {
    if retrieval.is_empty() {
        return 0.0;
    }
    let normalized = normalize(response);
    let matched = retrieval
        .records()
        .flat_map(|record| record.attribute_values())
        .filter(|value| contains_phrase(&normalized, &normalize(value)))
        .count();
    let checked = ATTRIBUTES_PER_RECORD * retrieval.len();
    (matched as f64 / checked as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use songrag_rag::{Record, ScoredRecord};

    fn retrieval(records: Vec<Record>) -> RetrievalResult {
        RetrievalResult::from_ordered(
            records.into_iter().map(|record| ScoredRecord { record, score: 1.0 }).collect(),
        )
    }

    fn imagine() -> Record {
        Record::new("Imagine", "John Lennon", "Rock", "Peaceful", 1971)
    }

    #[test]
    fn two_of_five_attributes() {
        let score = factuality_score("Imagine was written by John Lennon.", &retrieval(vec![imagine()]));
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn all_attributes() {
        let score = factuality_score(
            "Imagine by John Lennon is a peaceful rock song from 1971.",
            &retrieval(vec![imagine()]),
        );
        assert_eq!(score, 1.0);
    }

    #[test]
    fn empty_retrieval_scores_zero() {
        assert_eq!(factuality_score("Imagine by John Lennon", &RetrievalResult::empty()), 0.0);
    }

    #[test]
    fn normalizes_over_every_retrieved_record() {
        let other = Record::new("Happy", "Pharrell Williams", "Pop", "Happy", 2013);
        let score =
            factuality_score("Imagine was written by John Lennon.", &retrieval(vec![imagine(), other]));
        assert!((score - 0.2).abs() < 1e-9);
    }
}
