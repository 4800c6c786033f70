//! Telemetry records: answered requests, recommendation lists and
//! favorites changes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use songrag_eval::EvaluationResult;
use songrag_rag::{Record, RetrievalResult, RetrievalSummary};
use uuid::Uuid;

/// One query, the response given, what was retrieved for it and how the
/// response was judged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestTrace {
    pub trace_id: Uuid,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub response: String,
    pub retrieval: RetrievalSummary,
    pub evaluation: EvaluationResult,
}

impl RequestTrace {
    /// Create a trace with a fresh id, stamped now.
    pub fn new(
        session_id: impl Into<String>,
        user_id: Option<String>,
        query: impl Into<String>,
        response: impl Into<String>,
        retrieval: &RetrievalResult,
        evaluation: EvaluationResult,
    ) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            session_id: session_id.into(),
            user_id,
            timestamp: Utc::now(),
            query: query.into(),
            response: response.into(),
            retrieval: retrieval.summary(),
            evaluation,
        }
    }

    /// Override the timestamp, for replaying stored traces.
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Which recommender produced a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Mood,
    User,
    Hybrid,
    Similar,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mood => "mood",
            Self::User => "user",
            Self::Hybrid => "hybrid",
            Self::Similar => "similar",
        })
    }
}

/// A recommendation list handed to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationTrace {
    pub trace_id: Uuid,
    pub session_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub recommendation_type: RecommendationKind,
    pub recommendations: Vec<Record>,
    /// The favorites the list was derived from, if any.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub user_favorites: Vec<Record>,
}

impl RecommendationTrace {
    pub fn new(
        session_id: impl Into<String>,
        user_id: Option<String>,
        recommendation_type: RecommendationKind,
        recommendations: Vec<Record>,
    ) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            session_id: session_id.into(),
            user_id,
            timestamp: Utc::now(),
            recommendation_type,
            recommendations,
            user_favorites: Vec::new(),
        }
    }

    pub fn with_favorites(mut self, favorites: Vec<Record>) -> Self {
        self.user_favorites = favorites;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// A change to, or read of, a user's favorites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoritesAction {
    Add,
    Remove,
    Clear,
    List,
}

impl fmt::Display for FavoritesAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Clear => "clear",
            Self::List => "list",
        })
    }
}

/// One favorites action and the user's favorites after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesTrace {
    pub trace_id: Uuid,
    pub session_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub action: FavoritesAction,
    /// The record added or removed.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub song: Option<Record>,
    pub favorites: Vec<Record>,
}

impl FavoritesTrace {
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        action: FavoritesAction,
        song: Option<Record>,
        favorites: Vec<Record>,
    ) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            session_id: session_id.into(),
            user_id: user_id.into(),
            timestamp: Utc::now(),
            action,
            song,
            favorites,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Anything a [`TelemetrySink`](crate::TelemetrySink) can record.
///
/// Serialized with a `"type"` tag: `"request"`, `"recommendation"` or `"favorites"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    Request(RequestTrace),
    Recommendation(RecommendationTrace),
    Favorites(FavoritesTrace),
}

impl TelemetryEvent {
    pub fn trace_id(&self) -> Uuid {
        match self {
            Self::Request(t) => t.trace_id,
            Self::Recommendation(t) => t.trace_id,
            Self::Favorites(t) => t.trace_id,
        }
    }

    pub fn session_id(&self) -> &str {
        match self {
            Self::Request(t) => &t.session_id,
            Self::Recommendation(t) => &t.session_id,
            Self::Favorites(t) => &t.session_id,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Request(t) => t.user_id.as_deref(),
            Self::Recommendation(t) => t.user_id.as_deref(),
            Self::Favorites(t) => Some(&t.user_id),
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::Request(t) => t.timestamp,
            Self::Recommendation(t) => t.timestamp,
            Self::Favorites(t) => t.timestamp,
        }
    }

    pub fn as_request(&self) -> Option<&RequestTrace> {
        match self {
            Self::Request(t) => Some(t),
            _ => None,
        }
    }
}

impl From<RequestTrace> for TelemetryEvent {
    fn from(trace: RequestTrace) -> Self {
        Self::Request(trace)
    }
}

impl From<RecommendationTrace> for TelemetryEvent {
    fn from(trace: RecommendationTrace) -> Self {
        Self::Recommendation(trace)
    }
}

impl From<FavoritesTrace> for TelemetryEvent {
    fn from(trace: FavoritesTrace) -> Self {
        Self::Favorites(trace)
    }
}
