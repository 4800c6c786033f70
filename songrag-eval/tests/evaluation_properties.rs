//! Property tests for evaluator invariants.

use std::sync::Arc;

use proptest::prelude::*;
use songrag_eval::{ResponseEvaluator, Tone, factuality_score};
use songrag_rag::{Corpus, Record, RetrievalResult, ScoredRecord};

fn corpus() -> Arc<Corpus> {
    Arc::new(Corpus::new(vec![
        Record::new("Imagine", "John Lennon", "Rock", "Peaceful", 1971),
        Record::new("Bohemian Rhapsody", "Queen", "Rock", "Epic", 1975),
        Record::new("Happy", "Pharrell Williams", "Pop", "Happy", 2013),
        Record::new("Someone Like You", "Adele", "Pop", "Sad", 2011),
    ]))
}

fn retrieval_of(corpus: &Corpus, mask: &[bool]) -> RetrievalResult {
    RetrievalResult::from_ordered(
        corpus
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(record, _)| ScoredRecord { record: record.clone(), score: 1.0 })
            .collect(),
    )
}

const APOLOGIES: &[&str] = &[
    "I'm sorry, I don't have that information.",
    "Unfortunately, I can't find that song.",
    "Sorry, that is not available.",
    "I apologize, but I do not have details about that.",
];

/// Words that appear in no record of [`corpus`].
const UNRELATED_WORDS: &[&str] = &["zebra", "quasar", "nimbus", "vortex", "marimba", "glacier"];

proptest! {
    #[test]
    fn factuality_is_bounded(
        response in "\\PC{0,120}",
        mask in prop::collection::vec(any::<bool>(), 4),
    ) {
        let corpus = corpus();
        let score = factuality_score(&response, &retrieval_of(&corpus, &mask));
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn empty_retrieval_has_zero_factuality(response in "\\PC{0,120}") {
        prop_assert_eq!(factuality_score(&response, &RetrievalResult::empty()), 0.0);
    }

    #[test]
    fn recall_is_one_when_nothing_is_relevant(
        words in prop::collection::vec(prop::sample::select(UNRELATED_WORDS), 1..5),
        mask in prop::collection::vec(any::<bool>(), 4),
    ) {
        let corpus = corpus();
        let evaluator = ResponseEvaluator::with_defaults(corpus.clone());
        let query = words.join(" ");
        let verdict = evaluator.evaluate(&query, "Here you go.", &retrieval_of(&corpus, &mask));
        prop_assert_eq!(verdict.rag_recall, 1.0);
        prop_assert_eq!(verdict.rag_precision, 0.0);
    }

    #[test]
    fn apologies_are_never_hallucinations(
        apology in prop::sample::select(APOLOGIES),
        query in "[a-zA-Z ?]{0,40}",
        mask in prop::collection::vec(any::<bool>(), 4),
    ) {
        let corpus = corpus();
        let evaluator = ResponseEvaluator::with_defaults(corpus.clone());
        let verdict = evaluator.evaluate(&query, apology, &retrieval_of(&corpus, &mask));
        prop_assert_eq!(verdict.tone, Tone::Apologetic);
        prop_assert!(!verdict.hallucination_detected);
    }
}
