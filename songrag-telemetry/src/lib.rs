//! Request telemetry for songrag.
//!
//! A [`RequestTrace`] records one answered query with its retrieval summary
//! and evaluation. [`RecommendationTrace`] and [`FavoritesTrace`] record
//! recommendation lists and favorites changes. All three travel as a
//! [`TelemetryEvent`] to a [`TelemetrySink`]:
//! - [`InMemoryTelemetrySink`] keeps them for inspection, session summaries and JSON export
//! - [`TracingSink`] logs them as structured events
//! - [`MultiSink`] fans out to several sinks
//!
//! [`init_logging`] and [`init_json_logging`] install the global `tracing` subscriber.

pub mod error;
pub mod init;
pub mod sink;
pub mod trace;

pub use error::{Result, TelemetryError};
pub use init::{init_json_logging, init_logging};
pub use sink::{InMemoryTelemetrySink, MultiSink, SessionSummary, TelemetrySink, TracingSink};
pub use trace::{
    FavoritesAction, FavoritesTrace, RecommendationKind, RecommendationTrace, RequestTrace,
    TelemetryEvent,
};
