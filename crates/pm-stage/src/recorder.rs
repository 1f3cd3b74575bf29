//! StageRecorder — shared sink the session components report stages into
//!
//! Reels, the session barrier and the coordinator each hold a clone.
//! Recording never fails and never blocks for longer than a push.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::event::{StageEvent, StagePayload};
use crate::stage::Stage;
use crate::trace::StageTrace;

/// Cloneable handle to a trace being recorded
#[derive(Debug, Clone)]
pub struct StageRecorder {
    trace: Arc<Mutex<StageTrace>>,
}

impl StageRecorder {
    /// Start recording a new trace
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace: Arc::new(Mutex::new(StageTrace::new(trace_id, game_id))),
        }
    }

    /// Builder: stamp a metadata entry onto the trace
    pub fn with_metadata(self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.trace.lock().set_metadata(key, value);
        self
    }

    /// Record a stage at a session-relative timestamp
    pub fn record(&self, stage: Stage, timestamp_ms: f64) {
        self.trace.lock().push(StageEvent::new(stage, timestamp_ms));
    }

    /// Record a stage with payload
    pub fn record_with(&self, stage: Stage, timestamp_ms: f64, payload: StagePayload) {
        self.trace
            .lock()
            .push(StageEvent::with_payload(stage, timestamp_ms, payload));
    }

    /// Number of events recorded so far
    pub fn len(&self) -> usize {
        self.trace.lock().events.len()
    }

    /// Check if nothing was recorded yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the trace as recorded so far
    pub fn snapshot(&self) -> StageTrace {
        self.trace.lock().clone()
    }
}

impl Default for StageRecorder {
    fn default() -> Self {
        Self::new("session", "prize-machine")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_reaches_snapshot() {
        let recorder = StageRecorder::default()
            .with_metadata("timing", "turbo")
            .with_metadata("seed", 7u64);

        let trace = recorder.snapshot();
        assert_eq!(trace.metadata.get("timing"), Some(&serde_json::json!("turbo")));
        assert_eq!(trace.metadata.get("seed"), Some(&serde_json::json!(7)));
    }

    #[test]
    fn test_clones_share_trace() {
        let recorder = StageRecorder::default();
        let other = recorder.clone();

        recorder.record(Stage::SpinStart, 0.0);
        other.record(Stage::SpinEnd, 10.0);

        let trace = recorder.snapshot();
        assert_eq!(trace.events.len(), 2);
        assert_eq!(other.len(), 2);
        assert!(matches!(trace.events[1].stage, Stage::SpinEnd));
    }
}
