//! Destinations for [`TelemetryEvent`]s.

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::Result;
use crate::trace::{RequestTrace, TelemetryEvent};

/// Receives every request, recommendation and favorites event.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: TelemetryEvent);
}

/// Aggregate view of one session's events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub total_traces: usize,
    pub requests: usize,
    pub recommendations: usize,
    pub favorites_actions: usize,
    pub unique_users: usize,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_minutes: f64,
}

/// Keeps every event in memory, in arrival order.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTelemetrySink {
    events: Arc<RwLock<Vec<TelemetryEvent>>>,
}

impl InMemoryTelemetrySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&[TelemetryEvent]) -> T) -> T {
        let events = self.events.read().unwrap_or_else(PoisonError::into_inner);
        f(events.as_slice())
    }

    pub fn len(&self) -> usize {
        self.read(<[TelemetryEvent]>::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every recorded event.
    pub fn traces(&self) -> Vec<TelemetryEvent> {
        self.read(<[TelemetryEvent]>::to_vec)
    }

    /// Only the answered-request traces.
    pub fn requests(&self) -> Vec<RequestTrace> {
        self.read(|events| events.iter().filter_map(TelemetryEvent::as_request).cloned().collect())
    }

    pub fn session_traces(&self, session_id: &str) -> Vec<TelemetryEvent> {
        self.read(|events| events.iter().filter(|e| e.session_id() == session_id).cloned().collect())
    }

    pub fn user_traces(&self, user_id: &str) -> Vec<TelemetryEvent> {
        self.read(|events| {
            events.iter().filter(|e| e.user_id() == Some(user_id)).cloned().collect()
        })
    }

    pub fn trace(&self, trace_id: Uuid) -> Option<TelemetryEvent> {
        self.read(|events| events.iter().find(|e| e.trace_id() == trace_id).cloned())
    }

    /// Summarize a session, or `None` if it has no events.
    pub fn session_summary(&self, session_id: &str) -> Option<SessionSummary> {
        self.read(|events| {
            let session: Vec<&TelemetryEvent> =
                events.iter().filter(|e| e.session_id() == session_id).collect();
            let start = session.iter().map(|e| e.timestamp()).min()?;
            let end = session.iter().map(|e| e.timestamp()).max()?;
            let count = |pred: fn(&TelemetryEvent) -> bool| session.iter().filter(|e| pred(e)).count();
            Some(SessionSummary {
                session_id: session_id.to_string(),
                total_traces: session.len(),
                requests: count(|e| matches!(e, TelemetryEvent::Request(_))),
                recommendations: count(|e| matches!(e, TelemetryEvent::Recommendation(_))),
                favorites_actions: count(|e| matches!(e, TelemetryEvent::Favorites(_))),
                unique_users: session.iter().filter_map(|e| e.user_id()).collect::<HashSet<_>>().len(),
                start,
                end,
                duration_minutes: (end - start).num_milliseconds() as f64 / 60_000.0,
            })
        })
    }

    /// All events as a pretty-printed JSON array, each tagged with its `type`.
    pub fn export_json(&self) -> Result<String> {
        self.read(|events| Ok(serde_json::to_string_pretty(events)?))
    }

    pub fn clear(&self) {
        self.events.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl TelemetrySink for InMemoryTelemetrySink {
    fn record(&self, event: TelemetryEvent) {
        self.events.write().unwrap_or_else(PoisonError::into_inner).push(event);
    }
}

/// Emits each event as a structured `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, event: TelemetryEvent) {
        match &event {
            TelemetryEvent::Request(trace) => {
                let evaluation = &trace.evaluation;
                info!(
                    trace_id = %trace.trace_id,
                    session_id = %trace.session_id,
                    user_id = trace.user_id.as_deref().unwrap_or(""),
                    query = %trace.query,
                    retrieved = trace.retrieval.count,
                    top_score = trace.retrieval.top_score.unwrap_or(0.0),
                    tone = %evaluation.tone,
                    factuality = evaluation.factuality_score,
                    hallucination = evaluation.hallucination_detected,
                    precision = evaluation.rag_precision,
                    recall = evaluation.rag_recall,
                    citation = evaluation.citation_present,
                    quality = %evaluation.quality,
                    "request trace"
                );
            }
            TelemetryEvent::Recommendation(trace) => {
                info!(
                    trace_id = %trace.trace_id,
                    session_id = %trace.session_id,
                    user_id = trace.user_id.as_deref().unwrap_or(""),
                    kind = %trace.recommendation_type,
                    recommended = trace.recommendations.len(),
                    favorites = trace.user_favorites.len(),
                    "recommendation trace"
                );
            }
            TelemetryEvent::Favorites(trace) => {
                info!(
                    trace_id = %trace.trace_id,
                    session_id = %trace.session_id,
                    user_id = %trace.user_id,
                    action = %trace.action,
                    song = trace.song.as_ref().map(|s| s.title.as_str()).unwrap_or(""),
                    favorites = trace.favorites.len(),
                    "favorites trace"
                );
            }
        }
    }
}

/// Fans one event out to several sinks.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Arc<dyn TelemetrySink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl TelemetrySink for MultiSink {
    fn record(&self, event: TelemetryEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.record(event.clone());
            }
            last.record(event);
        }
    }
}
