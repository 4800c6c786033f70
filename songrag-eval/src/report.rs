//! Aggregate statistics over many evaluations.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::result::{EvaluationResult, Quality, Tone};

/// Averages, rates and label distributions across a batch of evaluations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub total_evaluations: usize,
    pub average_factuality_score: f64,
    pub average_rag_precision: f64,
    pub average_rag_recall: f64,
    pub hallucination_rate: f64,
    pub citation_rate: f64,
    pub tone_distribution: BTreeMap<Tone, usize>,
    pub quality_distribution: BTreeMap<Quality, usize>,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl EvaluationReport {
    /// Summarize `results`. Averages and rates are rounded to three decimals.
    pub fn from_results(results: &[EvaluationResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }
        let total = results.len() as f64;
        let mean = |f: fn(&EvaluationResult) -> f64| round3(results.iter().map(f).sum::<f64>() / total);
        let rate = |f: fn(&EvaluationResult) -> bool| {
            round3(results.iter().filter(|r| f(r)).count() as f64 / total)
        };

        let mut tone_distribution = BTreeMap::new();
        let mut quality_distribution = BTreeMap::new();
        for result in results {
            *tone_distribution.entry(result.tone).or_insert(0) += 1;
            *quality_distribution.entry(result.quality).or_insert(0) += 1;
        }

        Self {
            total_evaluations: results.len(),
            average_factuality_score: mean(|r| r.factuality_score),
            average_rag_precision: mean(|r| r.rag_precision),
            average_rag_recall: mean(|r| r.rag_recall),
            hallucination_rate: rate(|r| r.hallucination_detected),
            citation_rate: rate(|r| r.citation_present),
            tone_distribution,
            quality_distribution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(tone: Tone, factuality: f64, hallucination: bool, quality: Quality) -> EvaluationResult {
        EvaluationResult {
            tone,
            factuality_score: factuality,
            hallucination_detected: hallucination,
            rag_precision: 1.0,
            rag_recall: 0.5,
            citation_present: !hallucination,
            quality,
        }
    }

    #[test]
    fn empty_batch_is_all_zero() {
        let report = EvaluationReport::from_results(&[]);
        assert_eq!(report.total_evaluations, 0);
        assert!(report.tone_distribution.is_empty());
    }

    #[test]
    fn averages_rates_and_distributions() {
        let report = EvaluationReport::from_results(&[
            result(Tone::Neutral, 0.4, false, Quality::Fair),
            result(Tone::Apologetic, 0.0, false, Quality::Poor),
            result(Tone::Neutral, 1.0, true, Quality::Fair),
        ]);
        assert_eq!(report.total_evaluations, 3);
        assert_eq!(report.average_factuality_score, 0.467);
        assert_eq!(report.average_rag_recall, 0.5);
        assert_eq!(report.hallucination_rate, 0.333);
        assert_eq!(report.citation_rate, 0.667);
        assert_eq!(report.tone_distribution.get(&Tone::Neutral), Some(&2));
        assert_eq!(report.quality_distribution.get(&Quality::Fair), Some(&2));
        assert_eq!(report.quality_distribution.get(&Quality::Excellent), None);
    }

    #[test]
    fn serializes_distribution_keys_as_labels() {
        let report =
            EvaluationReport::from_results(&[result(Tone::Friendly, 1.0, false, Quality::Excellent)]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tone_distribution"]["friendly"], 1);
        assert_eq!(json["quality_distribution"]["excellent"], 1);
    }
}
