//! Stage 3: hallucination detection.
//!
//! A response is flagged when it
//! - hedges or admits missing information while still asserting a concrete
//!   fact that none of the retrieved records support, or
//! - has low factuality while asserting concrete facts.
//!
//! Concrete facts are approximated by [`fact_candidates`]. A response that
//! declines to answer without naming anything is never flagged, however low
//! its factuality.

use songrag_rag::{Corpus, RetrievalResult};

use crate::rules::{NON_FACT_WORDS, UNCERTAINTY_PHRASES};
use crate::text::{contains_phrase, normalize};

/// Whether the normalized response contains any [`UNCERTAINTY_PHRASES`].
pub fn has_uncertainty(normalized: &str) -> bool {
    UNCERTAINTY_PHRASES.iter().any(|p| contains_phrase(normalized, p))
}

fn trim_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn ends_sentence(word: &str) -> bool {
    word.trim_end_matches(['"', '\'', ')', '\u{201d}']).ends_with(['.', '!', '?'])
}

/// Specific values the response asserts, lowercased.
///
/// Candidates are catalog titles, authors and years named in the response,
/// plus numbers and capitalized words that do not start a sentence. Anything
/// the query already mentions is an echo, not an assertion, and is skipped.
pub fn fact_candidates(response: &str, query: &str, corpus: &Corpus) -> Vec<String> {
    let normalized = normalize(response);
    let query = normalize(query);
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |candidate: String| {
        if !contains_phrase(&query, &candidate) && !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    };

    for record in corpus {
        for value in [&record.title, &record.author, &record.year.to_string()] {
            let value = normalize(value);
            if contains_phrase(&normalized, &value) {
                push(value);
            }
        }
    }

    let mut sentence_start = true;
    for raw in response.split_whitespace() {
        let word = trim_word(raw);
        if !word.is_empty() {
            let lowered = normalize(word);
            let is_number = word.len() >= 2 && word.chars().all(|c| c.is_ascii_digit());
            let is_proper = !sentence_start
                && word.chars().next().is_some_and(char::is_uppercase)
                && !NON_FACT_WORDS.contains(&lowered.as_str());
            if is_number || is_proper {
                push(lowered);
            }
        }
        sentence_start = ends_sentence(raw);
    }
    candidates
}

/// Candidates that no retrieved record's searchable text contains.
pub fn unsupported_facts<'a>(
    candidates: &'a [String],
    retrieval: &RetrievalResult,
) -> Vec<&'a str> {
    let grounded: Vec<String> = retrieval.records().map(|r| normalize(&r.searchable_text())).collect();
    candidates
        .iter()
        .filter(|c| !grounded.iter().any(|text| contains_phrase(text, c)))
        .map(String::as_str)
        .collect()
}

/// Decide whether the response hallucinates.
pub fn detect_hallucination(
    query: &str,
    response: &str,
    retrieval: &RetrievalResult,
    corpus: &Corpus,
    factuality_score: f64,
    factuality_threshold: f64,
) -> bool {
    if response.trim().is_empty() {
        return false;
    }
    let candidates = fact_candidates(response, query, corpus);
    if candidates.is_empty() {
        return false;
    }
    if factuality_score < factuality_threshold {
        return true;
    }
    has_uncertainty(&normalize(response)) && !unsupported_facts(&candidates, retrieval).is_empty()
}
