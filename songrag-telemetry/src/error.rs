//! Error types for the `songrag-telemetry` crate.

use thiserror::Error;

/// Errors raised while exporting traces or installing the logger.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Traces could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A global subscriber is already installed, or the filter is invalid.
    #[error("Failed to initialize subscriber: {0}")]
    SubscriberInit(String),
}

/// A convenience result type for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;
