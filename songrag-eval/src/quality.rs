//! Stage 5: citation check and quality roll-up.

use songrag_rag::RetrievalResult;

use crate::config::QualityThresholds;
use crate::result::Quality;
use crate::text::{contains_phrase, normalize};

/// Whether the response names at least one retrieved record's title or author.
pub fn citation_present(response: &str, retrieval: &RetrievalResult) -> bool {
    let normalized = normalize(response);
    retrieval.records().any(|r| {
        contains_phrase(&normalized, &normalize(&r.title))
            || contains_phrase(&normalized, &normalize(&r.author))
    })
}

/// Apply the [`QualityThresholds`] decision table.
pub fn assess_quality(
    thresholds: &QualityThresholds,
    factuality_score: f64,
    hallucination_detected: bool,
    citation_present: bool,
    rag_precision: f64,
) -> Quality {
    let quality = if factuality_score >= thresholds.excellent_factuality && citation_present {
        Quality::Excellent
    } else if factuality_score >= thresholds.good_factuality
        && rag_precision >= thresholds.good_precision
    {
        Quality::Good
    } else if factuality_score >= thresholds.fair_factuality {
        Quality::Fair
    } else {
        Quality::Poor
    };

    if hallucination_detected { quality.min(Quality::Fair) } else { quality }
}

#[cfg(test)]
mod tests {
    use super::*;
    use songrag_rag::{Record, ScoredRecord};

    fn imagine() -> RetrievalResult {
        RetrievalResult::from_ordered(vec![ScoredRecord {
            record: Record::new("Imagine", "John Lennon", "Rock", "Peaceful", 1971),
            score: 1.0,
        }])
    }

    #[test]
    fn citation_by_title_or_author() {
        assert!(citation_present("Imagine is lovely.", &imagine()));
        assert!(citation_present("That one is by john lennon", &imagine()));
        assert!(!citation_present("A peaceful rock song from 1971.", &imagine()));
        assert!(!citation_present("Imagine", &RetrievalResult::empty()));
    }

    #[test]
    fn decision_table() {
        let t = QualityThresholds::default();
        assert_eq!(assess_quality(&t, 0.9, false, true, 1.0), Quality::Excellent);
        assert_eq!(assess_quality(&t, 0.9, false, false, 1.0), Quality::Good);
        assert_eq!(assess_quality(&t, 0.6, false, true, 0.2), Quality::Fair);
        assert_eq!(assess_quality(&t, 0.4, false, true, 1.0), Quality::Fair);
        assert_eq!(assess_quality(&t, 0.1, false, true, 1.0), Quality::Poor);
    }

    #[test]
    fn hallucination_caps_at_fair() {
        let t = QualityThresholds::default();
        assert_eq!(assess_quality(&t, 1.0, true, true, 1.0), Quality::Fair);
        assert_eq!(assess_quality(&t, 0.0, true, false, 0.0), Quality::Poor);
    }

    #[test]
    fn quality_is_monotone_in_factuality() {
        let t = QualityThresholds::default();
        let mut previous = Quality::Poor;
        for step in 0..=100 {
            let f = f64::from(step) / 100.0;
            let q = assess_quality(&t, f, false, true, 1.0);
            assert!(q >= previous);
            previous = q;
        }
    }
}
