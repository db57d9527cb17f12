//! StageTrace: A recorded sequence of stage events for one play session

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event::{StageEvent, WheelEvent};
use crate::stage::SpinStage;

/// A complete trace of stage events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Unique identifier for this trace
    pub trace_id: String,

    /// Player the trace belongs to
    #[serde(default)]
    pub player: Option<String>,

    /// All events in chronological order
    pub events: Vec<StageEvent>,

    /// When this trace was recorded
    pub recorded_at: DateTime<Utc>,
}

impl StageTrace {
    /// Create a new empty trace
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            player: None,
            events: Vec::new(),
            recorded_at: Utc::now(),
        }
    }

    /// Set the player
    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    /// Add an event to the trace
    pub fn push(&mut self, event: StageEvent) {
        self.events.push(event);
    }

    /// Number of events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Is the trace empty?
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Stage after the last event, if any
    pub fn final_stage(&self) -> Option<SpinStage> {
        self.events.last().map(|e| e.stage)
    }

    /// Completed rounds as (category, item)
    pub fn results(&self) -> Vec<(&str, &str)> {
        self.events
            .iter()
            .filter_map(|e| match &e.event {
                WheelEvent::ResultReady { category, item, .. } => {
                    Some((category.as_str(), item.as_str()))
                }
                _ => None,
            })
            .collect()
    }

    /// Total duration from first to last event (ms)
    pub fn duration_ms(&self) -> f64 {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp_ms - first.timestamp_ms,
            _ => 0.0,
        }
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
