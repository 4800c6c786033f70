//! The response evaluation pipeline.
//!
//! [`ResponseEvaluator::evaluate`] runs five pure stages in order:
//! tone, factuality, hallucination, retrieval precision/recall, then
//! citation and quality. Each stage only reads the query, the response,
//! the retrieval and the outputs of earlier stages.
//!
//! # Example
//!
//! ```rust,ignore
//! use songrag_eval::{EvaluatorConfig, ResponseEvaluator};
//!
//! let evaluator = ResponseEvaluator::new(corpus, EvaluatorConfig::default())?;
//! let verdict = evaluator.evaluate("Who wrote Imagine?", "Imagine was written by John Lennon.", &retrieval);
//! assert!(verdict.citation_present);
//! ```

use std::sync::Arc;

use songrag_rag::{Corpus, RetrievalResult};
use tracing::debug;

use crate::config::EvaluatorConfig;
use crate::error::Result;
use crate::factuality::factuality_score;
use crate::hallucination::detect_hallucination;
use crate::metrics::{RelevanceJudge, retrieval_metrics};
use crate::quality::{assess_quality, citation_present};
use crate::result::EvaluationResult;
use crate::tone::classify_tone;

/// Scores responses against the records retrieved for them.
///
/// Holds the corpus the retrieval ran against, which recall and the
/// hallucination check need. Stateless otherwise, so one evaluator can be
/// shared across threads.
#[derive(Debug, Clone)]
pub struct ResponseEvaluator {
    corpus: Arc<Corpus>,
    config: EvaluatorConfig,
}

impl ResponseEvaluator {
    /// Create an evaluator after validating `config`.
    pub fn new(corpus: Arc<Corpus>, config: EvaluatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { corpus, config })
    }

    /// An evaluator with the default configuration.
    pub fn with_defaults(corpus: Arc<Corpus>) -> Self {
        Self { corpus, config: EvaluatorConfig::default() }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    /// Evaluate one response. Never fails: empty responses and empty
    /// retrievals produce minimum scores.
    pub fn evaluate(
        &self,
        query: &str,
        response: &str,
        retrieval: &RetrievalResult,
    ) -> EvaluationResult {
        let tone = classify_tone(response);
        let factuality = factuality_score(response, retrieval);
        let hallucination_detected = detect_hallucination(
            query,
            response,
            retrieval,
            &self.corpus,
            factuality,
            self.config.hallucination_factuality_threshold,
        );
        let judge =
            RelevanceJudge::new(query, self.config.min_token_len, &self.config.relevance_stop_words);
        let metrics = retrieval_metrics(&judge, retrieval, &self.corpus);
        let citation = citation_present(response, retrieval);
        let quality = assess_quality(
            &self.config.quality,
            factuality,
            hallucination_detected,
            citation,
            metrics.precision,
        );

        debug!(
            %tone,
            factuality,
            hallucination_detected,
            precision = metrics.precision,
            recall = metrics.recall,
            citation,
            %quality,
            "evaluated response"
        );

        EvaluationResult {
            tone,
            factuality_score: factuality,
            hallucination_detected,
            rag_precision: metrics.precision,
            rag_recall: metrics.recall,
            citation_present: citation,
            quality,
        }
    }
}
