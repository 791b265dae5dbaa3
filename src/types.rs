//! Configuration and introspection types for a3s-signal
//!
//! All types use camelCase JSON serialization.

use crate::error::{EventError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name used when an event is created without one
pub const DEFAULT_EVENT_NAME: &str = "event";

fn default_name() -> String {
    DEFAULT_EVENT_NAME.to_string()
}

/// Event configuration
///
/// ```json
/// { "name": "order.placed", "maxDepth": 4 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventConfig {
    /// Label attached to every log record emitted by the event
    #[serde(default = "default_name")]
    pub name: String,

    /// Maximum nesting of firings accepted by `Event::try_fire`
    ///
    /// `None` means unlimited. Plain `Event::fire` ignores this limit.
    #[serde(default)]
    pub max_depth: Option<usize>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            max_depth: None,
        }
    }
}

impl EventConfig {
    /// Create a config with the given name and no depth limit
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_depth: None,
        }
    }

    /// Limit how deeply `try_fire` may nest
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Check the config for values an event cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(EventError::Config("event name must not be empty".to_string()));
        }
        if self.max_depth == Some(0) {
            return Err(EventError::Config(format!(
                "maxDepth for event '{}' must be at least 1",
                self.name
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            EventError::Config(format!(
                "Failed to read event config {}: {}",
                path.display(),
                e
            ))
        })?;

        let config = Self::from_json(&json)?;
        tracing::debug!(path = %path.display(), event = %config.name, "Event config loaded");
        Ok(config)
    }
}

/// Lifecycle state of a `Subscription`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubscriptionState {
    /// The callback is registered and will run on the next firing
    Active,
    /// The subscription removed its own callback
    Released,
    /// The event was dropped first; there was nothing left to remove
    Orphaned,
}

impl SubscriptionState {
    /// Whether this is one of the two end states
    pub fn is_terminal(self) -> bool {
        !matches!(self, SubscriptionState::Active)
    }
}

/// Point-in-time view of an event's registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    /// Event name
    pub name: String,
    /// Registered callbacks of both kinds
    pub bindings: usize,
    /// Callbacks owned by a live `Subscription`
    pub subscriptions: usize,
    /// Callbacks registered with `permanent_bind`
    pub permanent: usize,
    /// Number of firings started so far, nested ones included
    pub fires: u64,
    /// Firings currently on the stack
    pub depth: usize,
}
