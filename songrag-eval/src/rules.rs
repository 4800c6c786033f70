//! Keyword rule tables used by tone classification and hallucination detection.
//!
//! Rules are plain data so they can be listed and tested on their own. Phrases
//! are lowercase and matched on word boundaries against the normalized response.

use crate::result::Tone;

/// A tone and the phrases that signal it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneRule {
    pub tone: Tone,
    pub phrases: &'static [&'static str],
}

/// Tone rules in priority order. The first rule with a matching phrase wins;
/// no match means [`Tone::Neutral`].
pub const TONE_RULES: &[ToneRule] = &[
    ToneRule {
        tone: Tone::Apologetic,
        phrases: &[
            "sorry",
            "unfortunately",
            "apologize",
            "apologies",
            "don't have",
            "do not have",
            "can't find",
            "cannot find",
            "couldn't find",
            "not available",
        ],
    },
    ToneRule {
        tone: Tone::Friendly,
        phrases: &[
            "great",
            "wonderful",
            "amazing",
            "awesome",
            "fantastic",
            "love",
            "enjoy",
            "glad",
        ],
    },
];

/// Phrases signalling that the response is unsure or lacks the information.
pub const UNCERTAINTY_PHRASES: &[&str] = &[
    "don't have",
    "do not have",
    "no information",
    "not sure",
    "not certain",
    "can't find",
    "couldn't find",
    "i think",
    "i believe",
    "i guess",
    "i assume",
    "probably",
    "possibly",
    "might be",
    "could be",
];

/// Capitalized words that never count as a concrete fact.
pub const NON_FACT_WORDS: &[&str] = &["i", "i'm", "i've", "i'll", "i'd"];

/// Query words ignored when judging record relevance.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "who", "what", "when", "where", "why", "how", "the", "and", "but", "for", "with", "are",
    "was", "were",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apologetic_rule_outranks_friendly() {
        let order: Vec<Tone> = TONE_RULES.iter().map(|r| r.tone).collect();
        assert_eq!(order, vec![Tone::Apologetic, Tone::Friendly]);
    }

    #[test]
    fn phrases_are_lowercase() {
        let all = TONE_RULES
            .iter()
            .flat_map(|r| r.phrases.iter())
            .chain(UNCERTAINTY_PHRASES)
            .chain(NON_FACT_WORDS)
            .chain(DEFAULT_STOP_WORDS);
        for phrase in all {
            assert_eq!(*phrase, phrase.to_lowercase());
        }
    }
}
