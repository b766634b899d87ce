//! ---
//! acts_section: "02-event-bridge"
//! acts_subsection: "module"
//! acts_type: "source"
//! acts_scope: "code"
//! acts_description: "Event envelope delivered to registered callbacks."
//! acts_version: "v0.0.0-prealpha"
//! acts_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use uuid::Uuid;

/// Payload delivered by a worker in response to a posted message.
pub const EVENT_MESSAGE: &str = "message";
/// Failure reported by the external object.
pub const EVENT_ERROR: &str = "error";
/// The external object stopped; emitted once per object.
pub const EVENT_EXIT: &str = "exit";
/// A new sensor reading.
pub const EVENT_CHANGE: &str = "change";

/// Event envelope handed to every callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier for tracing.
    pub id: Uuid,
    /// Event name callbacks are registered against.
    pub name: String,
    /// Arbitrary payload carried by the event.
    #[serde(default)]
    pub payload: JsonValue,
    /// Timestamp when the event was created.
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Construct an event with an arbitrary name and payload.
    pub fn new(name: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            payload,
            timestamp: Utc::now(),
        }
    }

    /// A `message` event carrying the provided payload.
    pub fn message(payload: JsonValue) -> Self {
        Self::new(EVENT_MESSAGE, payload)
    }

    /// An `error` event describing a failure inside the external object.
    pub fn error(error: ErrorEvent) -> Self {
        let payload = serde_json::to_value(&error)
            .unwrap_or_else(|_| json!({ "message": error.message }));
        Self::new(EVENT_ERROR, payload)
    }

    /// An `exit` event with the provided exit code.
    pub fn exit(code: i32) -> Self {
        Self::new(EVENT_EXIT, json!({ "code": code }))
    }

    /// Returns true when the event has the given name.
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// Payload as a string slice, if it is a JSON string.
    pub fn as_str(&self) -> Option<&str> {
        self.payload.as_str()
    }

    /// Decode the payload into a concrete type.
    pub fn decode<T: DeserializeOwned>(&self) -> crate::Result<T> {
        Ok(serde_json::from_value(self.payload.clone())?)
    }

    /// Exit code for `exit` events.
    pub fn exit_code(&self) -> Option<i32> {
        if !self.is(EVENT_EXIT) {
            return None;
        }
        self.payload
            .get("code")
            .and_then(JsonValue::as_i64)
            .and_then(|code| i32::try_from(code).ok())
    }
}

/// Error details carried by `error` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Human-readable description.
    pub message: String,
    /// Script or component that raised the error.
    #[serde(default)]
    pub filename: Option<String>,
    /// Line number, when known.
    #[serde(default)]
    pub lineno: Option<u32>,
    /// Column number, when known.
    #[serde(default)]
    pub colno: Option<u32>,
}

impl ErrorEvent {
    /// Construct an error without location information.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            filename: None,
            lineno: None,
            colno: None,
        }
    }

    /// Attach the component that raised the error.
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_only_for_exit_events() {
        assert_eq!(Event::exit(3).exit_code(), Some(3));
        assert_eq!(Event::message(json!({ "code": 3 })).exit_code(), None);
    }

    #[test]
    fn error_events_decode_back() {
        let event = Event::error(ErrorEvent::new("boom").with_filename("workers/echo.js"));
        assert!(event.is(EVENT_ERROR));
        let decoded: ErrorEvent = event.decode().unwrap();
        assert_eq!(decoded.message, "boom");
        assert_eq!(decoded.filename.as_deref(), Some("workers/echo.js"));
    }

    #[test]
    fn decode_mismatch_is_reported() {
        let event = Event::message(json!("text"));
        assert!(matches!(
            event.decode::<u32>(),
            Err(crate::BridgeError::Json(_))
        ));
        assert_eq!(event.as_str(), Some("text"));
    }
}
