//! Evaluation verdict types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Overall tone of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Friendly,
    Neutral,
    Apologetic,
}

/// Ordinal quality label, `Poor < Fair < Good < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Friendly => "friendly",
            Self::Neutral => "neutral",
            Self::Apologetic => "apologetic",
        })
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Poor => "poor",
            Self::Fair => "fair",
            Self::Good => "good",
            Self::Excellent => "excellent",
        })
    }
}

/// The verdict for one (query, response, retrieval) triple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub tone: Tone,
    /// Share of retrieved attribute values quoted by the response, in `[0, 1]`.
    pub factuality_score: f64,
    pub hallucination_detected: bool,
    /// Share of retrieved records that are relevant to the query, in `[0, 1]`.
    pub rag_precision: f64,
    /// Share of the corpus's relevant records that were retrieved, in `[0, 1]`.
    pub rag_recall: f64,
    pub citation_present: bool,
    pub quality: Quality,
}
