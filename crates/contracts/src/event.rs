//! EventEnvelope - concrete event used by blueprint-driven tooling
//!
//! Library users dispatch their own event types; the core never looks inside.

use serde::{Deserialize, Serialize};

/// A named event with a free-form JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Event kind, matched against scripted handlers' `kinds`
    pub kind: String,

    #[serde(default)]
    pub payload: serde_json::Value,
}

impl EventEnvelope {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: serde_json::Value::Null,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}
