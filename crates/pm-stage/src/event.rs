//! StageEvent — A stage occurrence with metadata
//!
//! Wraps a Stage with a session-relative timestamp and an optional payload.

use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// A stage event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The canonical stage
    pub stage: Stage,

    /// Timestamp in milliseconds from the start of the session
    pub timestamp_ms: f64,

    /// Additional payload data
    #[serde(default)]
    pub payload: StagePayload,

    /// Custom tags for filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(stage: Stage, timestamp_ms: f64) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload: StagePayload::default(),
            tags: Vec::new(),
        }
    }

    /// Create with payload
    pub fn with_payload(stage: Stage, timestamp_ms: f64, payload: StagePayload) -> Self {
        Self {
            stage,
            timestamp_ms,
            payload,
            tags: Vec::new(),
        }
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Get stage type name
    pub fn type_name(&self) -> &'static str {
        self.stage.type_name()
    }
}

/// Additional payload data for a stage event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StagePayload {
    /// Faces shown by every read head (left → right)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reel_faces: Option<Vec<String>>,

    /// Rotation angle the reel settled at (radians)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,

    /// Stagger delay the reel waited before spinning (ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger_ms: Option<f64>,

    /// Session ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Arbitrary JSON for collaborator-specific data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<serde_json::Value>,
}

impl StagePayload {
    /// Create empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set read-head faces
    pub fn reel_faces(mut self, faces: Vec<String>) -> Self {
        self.reel_faces = Some(faces);
        self
    }

    /// Builder: set rotation
    pub fn rotation(mut self, radians: f64) -> Self {
        self.rotation = Some(radians);
        self
    }

    /// Builder: set stagger delay
    pub fn stagger_ms(mut self, ms: f64) -> Self {
        self.stagger_ms = Some(ms);
        self
    }

    /// Builder: set session ID
    pub fn session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Builder: set custom data
    pub fn custom(mut self, value: serde_json::Value) -> Self {
        self.custom = Some(value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_builder() {
        let payload = StagePayload::new()
            .reel_faces(vec!["W".into(), "I".into(), "N".into()])
            .stagger_ms(750.0);

        assert_eq!(payload.reel_faces.as_ref().map(|f| f.len()), Some(3));
        assert_eq!(payload.stagger_ms, Some(750.0));
        assert!(payload.rotation.is_none());
    }

    #[test]
    fn test_empty_payload_serializes_compact() {
        let event = StageEvent::new(Stage::SpinStart, 0.0);
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("reel_faces"));
        assert!(!json.contains("tags"));
    }
}
