//! StageEvent: A round occurrence with timing metadata
//!
//! Wraps a [`WheelEvent`] with the stage it left the machine in, the spin
//! generation it belongs to, and a timestamp.

use serde::{Deserialize, Serialize};

use crate::stage::{SpinStage, WheelKind};

/// What happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    /// A wheel started turning
    SpinStarted {
        /// Wheel being spun
        wheel: WheelKind,
        /// Random offset drawn for this spin, in [0, 360)
        degree: u32,
        /// Rotation the wheel will come to rest at
        target_rotation: u64,
        /// Number of segments on the wheel
        segments: usize,
    },

    /// Category wheel settled
    CategoryRevealed {
        category: String,
        index: usize,
    },

    /// Moved from the category reveal to the item wheel
    Advanced {
        category: String,
    },

    /// Item wheel settled; the round is complete
    ResultReady {
        category: String,
        item: String,
        index: usize,
    },

    /// Round restarted
    Reset,

    /// A settled spin was ignored because the round was reset meanwhile
    SpinDiscarded {
        /// Generation the stale spin was started in
        stale_generation: u64,
    },
}

impl WheelEvent {
    /// Stable snake_case name
    pub fn type_name(&self) -> &'static str {
        match self {
            WheelEvent::SpinStarted { .. } => "spin_started",
            WheelEvent::CategoryRevealed { .. } => "category_revealed",
            WheelEvent::Advanced { .. } => "advanced",
            WheelEvent::ResultReady { .. } => "result_ready",
            WheelEvent::Reset => "reset",
            WheelEvent::SpinDiscarded { .. } => "spin_discarded",
        }
    }

    /// Does this event change the visible stage?
    pub fn is_transition(&self) -> bool {
        !matches!(
            self,
            WheelEvent::SpinStarted { .. } | WheelEvent::SpinDiscarded { .. }
        )
    }
}

/// An event with full metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageEvent {
    /// The event
    pub event: WheelEvent,

    /// Stage the machine is in after the event
    pub stage: SpinStage,

    /// Round generation (bumped by every reset)
    pub generation: u64,

    /// Milliseconds since the machine was created
    pub timestamp_ms: f64,
}

impl StageEvent {
    /// Create a new stage event
    pub fn new(event: WheelEvent, stage: SpinStage, generation: u64, timestamp_ms: f64) -> Self {
        Self {
            event,
            stage,
            generation,
            timestamp_ms,
        }
    }

    /// Get event type name
    pub fn type_name(&self) -> &'static str {
        self.event.type_name()
    }
}
