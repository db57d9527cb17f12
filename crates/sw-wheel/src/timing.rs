//! Timing profiles for spin presentation
//!
//! Timing is pacing only. A spin resolves to the same winner whether it
//! takes four seconds or zero.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingProfile {
    /// Full wheel animation
    #[default]
    Normal,
    /// Shortened animation
    Turbo,
    /// Instant (tests, scripted runs)
    Studio,
    /// Scaled or hand-edited values
    Custom,
}

impl TimingProfile {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "normal" => Some(Self::Normal),
            "turbo" => Some(Self::Turbo),
            "studio" | "instant" => Some(Self::Studio),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// Detailed timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Time the wheel takes to come to rest (ms)
    pub spin_duration_ms: u64,

    /// Pause between the wheel settling and the reveal (ms)
    pub reveal_delay_ms: u64,
}

impl TimingConfig {
    /// Normal timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            spin_duration_ms: 4000,
            reveal_delay_ms: 500,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            spin_duration_ms: 1200,
            reveal_delay_ms: 200,
        }
    }

    /// Studio mode (no waiting at all)
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            spin_duration_ms: 0,
            reveal_delay_ms: 0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Studio => Self::studio(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = factor.max(0.0);
        let scale = |ms: u64| (ms as f64 * factor).round() as u64;
        Self {
            profile: TimingProfile::Custom,
            spin_duration_ms: scale(self.spin_duration_ms),
            reveal_delay_ms: scale(self.reveal_delay_ms),
        }
    }

    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    /// Time from `spin()` to the stage change
    pub fn total_spin_time(&self) -> Duration {
        self.spin_duration() + self.reveal_delay()
    }

    pub fn is_instant(&self) -> bool {
        self.total_spin_time().is_zero()
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let studio = TimingConfig::studio();

        assert!(turbo.total_spin_time() < normal.total_spin_time());
        assert!(studio.is_instant());
        assert_eq!(normal.total_spin_time(), Duration::from_millis(4500));
    }

    #[test]
    fn test_scaled() {
        let half = TimingConfig::normal().scaled(0.5);
        assert_eq!(half.profile, TimingProfile::Custom);
        assert_eq!(half.spin_duration_ms, 2000);
        assert_eq!(half.reveal_delay_ms, 250);
        assert!(TimingConfig::normal().scaled(-1.0).is_instant());
    }

    #[test]
    fn test_profile_names() {
        assert_eq!(TimingProfile::from_name("Turbo"), Some(TimingProfile::Turbo));
        assert_eq!(TimingProfile::from_name("instant"), Some(TimingProfile::Studio));
        assert_eq!(TimingProfile::from_name("warp"), None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: TimingConfig = serde_json::from_str(r#"{"spin_duration_ms": 10}"#).unwrap();
        assert_eq!(cfg.spin_duration_ms, 10);
        assert_eq!(cfg.reveal_delay_ms, 500);
    }
}
