//! Response evaluation for the songrag catalog question-answering core.
//!
//! Given a query, the generated response and the records retrieved for it,
//! [`ResponseEvaluator`] produces an [`EvaluationResult`]:
//! - tone (friendly, neutral, apologetic)
//! - factuality against the retrieved records
//! - hallucination detection
//! - retrieval precision and recall against the whole corpus
//! - whether a retrieved record is cited, and an overall quality label
//!
//! Every stage is a pure function and is exported on its own. Batches of
//! results roll up into an [`EvaluationReport`].

pub mod config;
pub mod error;
pub mod evaluator;
pub mod factuality;
pub mod hallucination;
pub mod metrics;
pub mod quality;
pub mod report;
pub mod result;
pub mod rules;
pub mod text;
pub mod tone;

pub use config::{EvaluatorConfig, EvaluatorConfigBuilder, QualityThresholds};
pub use error::{EvalError, Result};
pub use evaluator::ResponseEvaluator;
pub use factuality::factuality_score;
pub use hallucination::{detect_hallucination, fact_candidates, has_uncertainty, unsupported_facts};
pub use metrics::{RelevanceJudge, RetrievalMetrics, retrieval_metrics};
pub use quality::{assess_quality, citation_present};
pub use report::EvaluationReport;
pub use result::{EvaluationResult, Quality, Tone};
pub use tone::classify_tone;
