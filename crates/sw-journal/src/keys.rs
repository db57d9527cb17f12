//! Fixed storage keys
//!
//! Per-player data lives under a key suffixed with the username.

/// Account book: username → password digest
pub const USERS_KEY: &str = "sweet_users";

/// Logged-in player
pub const CURRENT_USER_KEY: &str = "sweet_current_user";

const WHEEL_DATA_PREFIX: &str = "sweet_wheel_data_";
const HISTORY_PREFIX: &str = "sweet_history_";

/// Key of a player's category catalog
pub fn wheel_data_key(username: &str) -> String {
    format!("{}{}", WHEEL_DATA_PREFIX, username)
}

/// Key of a player's result history
pub fn history_key(username: &str) -> String {
    format!("{}{}", HISTORY_PREFIX, username)
}
