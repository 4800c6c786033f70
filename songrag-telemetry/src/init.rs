//! Global logger installation.
//!
//! `RUST_LOG` wins over the default filter passed in. Installing a second
//! global subscriber is reported as [`TelemetryError::SubscriberInit`].

use tracing_subscriber::EnvFilter;

use crate::error::{Result, TelemetryError};

fn env_filter(default_filter: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| TelemetryError::SubscriberInit(format!("invalid filter '{default_filter}': {e}"))),
    }
}

/// Install a human-readable subscriber, e.g. `init_logging("songrag_rag=info")`.
pub fn init_logging(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_filter)?)
        .with_target(false)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))
}

/// Install a subscriber that writes one JSON object per event.
pub fn init_json_logging(default_filter: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_env_filter(env_filter(default_filter)?)
        .try_init()
        .map_err(|e| TelemetryError::SubscriberInit(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_an_error() {
        let _ = init_logging("info");
        let err = init_json_logging("info").unwrap_err();
        assert!(matches!(err, TelemetryError::SubscriberInit(_)));
    }
}
