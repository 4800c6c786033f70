//! Error types for the `songrag-eval` crate.
//!
//! Evaluating a response never fails; only building an evaluator from an
//! inconsistent configuration does.

use thiserror::Error;

/// Errors raised while configuring an evaluator.
#[derive(Debug, Error)]
pub enum EvalError {
    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// A convenience result type for evaluator configuration.
pub type Result<T> = std::result::Result<T, EvalError>;
