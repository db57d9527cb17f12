//! Application settings, read from `config.json` in the data directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sw_journal::DEFAULT_HISTORY_LIMIT;
use sw_wheel::WheelConfig;

/// File name of the settings file inside the data directory
pub const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Wheel turns, timing and seed
    pub wheel: WheelConfig,
    /// Records kept per player (0 = unlimited)
    pub history_limit: usize,
    /// Card title; `{user}` is replaced by the player name
    pub title_template: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wheel: WheelConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            title_template: "Today, {user}'s task is".to_string(),
        }
    }
}

impl AppConfig {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Load settings; a missing or unreadable file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("[Config] Ignoring {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
