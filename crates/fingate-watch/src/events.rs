//! Events emitted by the continuous verification loop.

use chrono::{DateTime, Utc};
use fingate_core::TemplateSlot;
use serde::{Deserialize, Serialize};

use crate::metadata::FingerMeta;

/// Broad category of a watch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A verification attempt completed.
    Status,

    /// The loop hit a device or link fault.
    Error,
}

/// Outcome carried by a watch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// The finger matched a stored template.
    Success,

    /// No stored template matched.
    Failed,

    /// The loop itself failed.
    Error,
}

/// One event from the watch loop, shaped for JSON consumers.
///
/// Optional fields are omitted from the serialized form when absent, so a
/// miss serializes as just `type`, `status`, `message`, and `timestamp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchEvent {
    /// Event category.
    #[serde(rename = "type")]
    pub kind: EventKind,

    /// Verification outcome.
    pub status: EventStatus,

    /// Human-readable description.
    pub message: String,

    /// Matched slot, present only on a match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u16>,

    /// Sensor-reported confidence, present only on a match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<u16>,

    /// Display name attached to the matched slot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Action attached to the matched slot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// When the event was produced.
    pub timestamp: DateTime<Utc>,
}

impl WatchEvent {
    /// Event for a successful match.
    #[must_use]
    pub fn matched(slot: TemplateSlot, accuracy: u16, meta: Option<FingerMeta>) -> Self {
        let (name, action) = match meta {
            Some(meta) => (meta.name, meta.action),
            None => (None, None),
        };
        WatchEvent {
            kind: EventKind::Status,
            status: EventStatus::Success,
            message: format!("Fingerprint matched at position {slot}"),
            position: Some(slot.index()),
            accuracy: Some(accuracy),
            name,
            action,
            timestamp: Utc::now(),
        }
    }

    /// Event for a finger that matched nothing.
    #[must_use]
    pub fn no_match() -> Self {
        WatchEvent {
            kind: EventKind::Status,
            status: EventStatus::Failed,
            message: "Fingerprint not recognized".to_string(),
            position: None,
            accuracy: None,
            name: None,
            action: None,
            timestamp: Utc::now(),
        }
    }

    /// Event for a loop fault.
    #[must_use]
    pub fn fault(message: impl Into<String>) -> Self {
        WatchEvent {
            kind: EventKind::Error,
            status: EventStatus::Error,
            message: message.into(),
            position: None,
            accuracy: None,
            name: None,
            action: None,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matched_event_shape() {
        let slot = TemplateSlot::new(4, 200).unwrap();
        let meta = FingerMeta {
            name: Some("front door".to_string()),
            action: Some("unlock".to_string()),
        };
        let event = WatchEvent::matched(slot, 87, Some(meta));
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "status");
        assert_eq!(json["status"], "success");
        assert_eq!(json["position"], 4);
        assert_eq!(json["accuracy"], 87);
        assert_eq!(json["name"], "front door");
        assert_eq!(json["action"], "unlock");
    }

    #[test]
    fn test_no_match_omits_optional_fields() {
        let json: serde_json::Value = serde_json::to_value(WatchEvent::no_match()).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json.get("position").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn test_fault_event() {
        let json: serde_json::Value =
            serde_json::to_value(WatchEvent::fault("serial line dropped")).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "serial line dropped");
    }
}
