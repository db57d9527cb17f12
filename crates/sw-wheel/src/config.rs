//! Wheel configuration

use serde::{Deserialize, Serialize};

use crate::timing::{TimingConfig, TimingProfile};

/// Full turns every spin makes before the random offset
pub const DEFAULT_MIN_FULL_TURNS: u32 = 5;

/// Wheel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Full turns added to every spin (at least 1)
    pub min_full_turns: u32,

    /// Presentation timing
    pub timing: TimingConfig,

    /// Fixed RNG seed for reproducible rounds
    pub seed: Option<u64>,
}

impl WheelConfig {
    /// Instant timing, for scripted play and tests
    pub fn instant() -> Self {
        Self {
            timing: TimingConfig::studio(),
            ..Self::default()
        }
    }

    pub fn with_timing(mut self, profile: TimingProfile) -> Self {
        self.timing = TimingConfig::from_profile(profile);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Full turns, clamped to at least one
    pub fn full_turns(&self) -> u32 {
        self.min_full_turns.max(1)
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            min_full_turns: DEFAULT_MIN_FULL_TURNS,
            timing: TimingConfig::default(),
            seed: None,
        }
    }
}
