//! Stage 1: tone classification.

use crate::result::Tone;
use crate::rules::{TONE_RULES, ToneRule};
use crate::text::{contains_phrase, normalize};

/// Classify `response` with [`TONE_RULES`].
pub fn classify_tone(response: &str) -> Tone {
    classify_with(&normalize(response), TONE_RULES)
}

/// Classify an already-normalized response against `rules` in priority order.
pub fn classify_with(normalized: &str, rules: &[ToneRule]) -> Tone {
    rules
        .iter()
        .find(|rule| rule.phrases.iter().any(|p| contains_phrase(normalized, p)))
        .map_or(Tone::Neutral, |rule| rule.tone)
}
