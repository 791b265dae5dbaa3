//! Error types for a3s-signal
//!
//! Binding, firing and releasing never fail. Errors only come from
//! configuration and from the depth-limited `Event::try_fire`.

use thiserror::Error;

/// Errors that can occur around an event
#[derive(Debug, Error)]
pub enum EventError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Nested firing refused by `try_fire`
    #[error("Event '{event}' reached its re-entrancy limit of {limit}")]
    DepthExceeded {
        event: String,
        limit: usize,
    },
}

/// Result type alias for event operations
pub type Result<T> = std::result::Result<T, EventError>;
