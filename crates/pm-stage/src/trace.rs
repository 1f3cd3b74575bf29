//! StageTrace — The complete timeline of one prize-machine session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event::StageEvent;
use crate::stage::{PresentationEffect, Stage, StageCategory};

/// Trace (de)serialization errors
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Trace JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A complete trace of stage events for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Game identifier
    pub game_id: String,

    /// All events in recording order
    pub events: Vec<StageEvent>,

    /// When this trace was started
    pub recorded_at: DateTime<Utc>,

    /// Custom metadata
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(trace_id: impl Into<String>, game_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            game_id: game_id.into(),
            events: Vec::new(),
            recorded_at: Utc::now(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Set a metadata entry, replacing any previous value
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Get total duration in milliseconds
    pub fn duration_ms(&self) -> f64 {
        let first = self.events.first().map(|e| e.timestamp_ms).unwrap_or(0.0);
        let last = self.events.last().map(|e| e.timestamp_ms).unwrap_or(0.0);
        last - first
    }

    /// Get events by category
    pub fn events_by_category(&self, category: StageCategory) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.category() == category)
            .collect()
    }

    /// Get events by stage type name
    pub fn events_by_type(&self, type_name: &str) -> Vec<&StageEvent> {
        self.events
            .iter()
            .filter(|e| e.stage.type_name() == type_name)
            .collect()
    }

    /// Find first event matching a predicate
    pub fn find_event<F>(&self, predicate: F) -> Option<&StageEvent>
    where
        F: Fn(&StageEvent) -> bool,
    {
        self.events.iter().find(|e| predicate(e))
    }

    /// Position of the first event matching a predicate
    pub fn position<F>(&self, predicate: F) -> Option<usize>
    where
        F: Fn(&StageEvent) -> bool,
    {
        self.events.iter().position(|e| predicate(e))
    }

    /// Check if trace contains a specific stage type
    pub fn has_stage(&self, type_name: &str) -> bool {
        self.events.iter().any(|e| e.stage.type_name() == type_name)
    }

    /// Timestamp at which a reel started spinning
    pub fn reel_start_ms(&self, reel_index: u8) -> Option<f64> {
        self.find_event(|e| matches!(e.stage, Stage::ReelSpinning { reel_index: r } if r == reel_index))
            .map(|e| e.timestamp_ms)
    }

    /// Timestamp at which a reel came to rest (normally or forced)
    pub fn reel_rest_ms(&self, reel_index: u8) -> Option<f64> {
        self.find_event(|e| e.stage.is_reel_rest() && e.stage.reel_index() == Some(reel_index))
            .map(|e| e.timestamp_ms)
    }

    /// All reel rest events (normal stops and forced settles)
    pub fn reel_rests(&self) -> Vec<&StageEvent> {
        self.events.iter().filter(|e| e.stage.is_reel_rest()).collect()
    }

    /// Effects that were started, in start order
    pub fn started_effects(&self) -> Vec<PresentationEffect> {
        self.events
            .iter()
            .filter_map(|e| match e.stage {
                Stage::PresentationStart { effect } => Some(effect),
                _ => None,
            })
            .collect()
    }

    /// Did any win-branch effect start?
    pub fn has_win_presentation(&self) -> bool {
        self.started_effects().iter().any(|e| e.is_win_branch())
    }

    /// Did any lose-branch effect start?
    pub fn has_lose_presentation(&self) -> bool {
        self.started_effects().iter().any(|e| e.is_lose_branch())
    }

    /// Destinations dispatched by the click-through handler
    pub fn navigations(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match &e.stage {
                Stage::Navigate { destination } => Some(destination.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Outcome recorded by the coordinator
    pub fn outcome(&self) -> Option<bool> {
        self.events.iter().find_map(|e| match e.stage {
            Stage::OutcomeResolved { has_won } => Some(has_won),
            _ => None,
        })
    }

    /// Are the events in non-decreasing timestamp order?
    pub fn is_chronological(&self) -> bool {
        self.events
            .windows(2)
            .all(|w| w[0].timestamp_ms <= w[1].timestamp_ms)
    }

    /// Validate trace has required stages
    pub fn validate(&self) -> TraceValidation {
        let reel_rest_count = self.reel_rests().len() as u8;
        let settled_at = self.position(|e| e.stage.type_name() == "session_settled");
        let last_rest = self.events.iter().rposition(|e| e.stage.is_reel_rest());

        TraceValidation {
            has_spin_start: self.has_stage("spin_start"),
            has_spin_end: self.has_stage("spin_end"),
            reel_rest_count,
            has_all_reels: reel_rest_count >= 3,
            barrier_after_last_reel: match (settled_at, last_rest) {
                (Some(settled), Some(rest)) => settled > rest,
                _ => false,
            },
            branches_exclusive: !(self.has_win_presentation() && self.has_lose_presentation()),
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TraceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get summary of trace
    pub fn summary(&self) -> TraceSummary {
        TraceSummary {
            trace_id: self.trace_id.clone(),
            game_id: self.game_id.clone(),
            event_count: self.events.len(),
            duration_ms: self.duration_ms(),
            has_won: self.outcome(),
            degraded: self.events.iter().any(|e| {
                matches!(e.stage, Stage::SessionSettled { degraded: true })
            }),
        }
    }
}

/// Validation result for a trace
#[derive(Debug, Clone, Default)]
pub struct TraceValidation {
    pub has_spin_start: bool,
    pub has_spin_end: bool,
    pub has_all_reels: bool,
    pub reel_rest_count: u8,
    pub barrier_after_last_reel: bool,
    pub branches_exclusive: bool,
}

impl TraceValidation {
    /// Check if trace is valid (has all required elements)
    pub fn is_valid(&self) -> bool {
        self.has_spin_start
            && self.has_spin_end
            && self.has_all_reels
            && self.barrier_after_last_reel
            && self.branches_exclusive
    }

    /// Get list of warnings
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();

        if !self.has_spin_start {
            warnings.push("Missing SPIN_START event");
        }
        if !self.has_spin_end {
            warnings.push("Missing SPIN_END event");
        }
        if !self.has_all_reels {
            warnings.push("Not all reels have stop events");
        }
        if !self.barrier_after_last_reel {
            warnings.push("SESSION_SETTLED recorded before the last reel stopped");
        }
        if !self.branches_exclusive {
            warnings.push("Both win and lose presentations started");
        }

        warnings
    }
}

/// Summary of a trace for quick overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub trace_id: String,
    pub game_id: String,
    pub event_count: usize,
    pub duration_ms: f64,
    pub has_won: Option<bool>,
    pub degraded: bool,
}
