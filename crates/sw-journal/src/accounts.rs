//! Local accounts and the logged-in session
//!
//! Passwords are kept as a SHA-256 digest of `username:password`. This keeps
//! them out of the blob in plain text; it is not a hardened credential store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{JournalError, JournalResult};
use crate::keys::{CURRENT_USER_KEY, USERS_KEY};
use crate::store::{SharedStore, load_json, save_json};

/// Logged-in identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

/// Username → password digest
type Accounts = BTreeMap<String, String>;

fn password_digest(username: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(username.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Account book over a key/value store
#[derive(Clone)]
pub struct AccountBook {
    store: SharedStore,
}

impl AccountBook {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn accounts(&self) -> JournalResult<Accounts> {
        Ok(load_json(self.store.as_ref(), USERS_KEY)?.unwrap_or_default())
    }

    fn start_session(&self, username: &str) -> JournalResult<User> {
        let user = User {
            username: username.to_string(),
        };
        save_json(self.store.as_ref(), CURRENT_USER_KEY, &user)?;
        log::info!("[Journal] {} logged in", username);
        Ok(user)
    }

    /// Create an account and log it in
    pub fn register(&self, username: &str, password: &str) -> JournalResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(JournalError::BlankField("username"));
        }
        if password.trim().is_empty() {
            return Err(JournalError::BlankField("password"));
        }

        let mut accounts = self.accounts()?;
        if accounts.contains_key(username) {
            return Err(JournalError::UserExists(username.to_string()));
        }
        accounts.insert(username.to_string(), password_digest(username, password));
        save_json(self.store.as_ref(), USERS_KEY, &accounts)?;

        self.start_session(username)
    }

    /// Verify credentials and log in
    pub fn login(&self, username: &str, password: &str) -> JournalResult<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(JournalError::BlankField("username"));
        }
        if password.trim().is_empty() {
            return Err(JournalError::BlankField("password"));
        }

        let accounts = self.accounts()?;
        match accounts.get(username) {
            Some(digest) if *digest == password_digest(username, password) => {
                self.start_session(username)
            }
            _ => Err(JournalError::BadCredentials),
        }
    }

    pub fn logout(&self) -> JournalResult<()> {
        self.store.remove(CURRENT_USER_KEY)
    }

    pub fn current_user(&self) -> JournalResult<Option<User>> {
        load_json(self.store.as_ref(), CURRENT_USER_KEY)
    }

    /// Current user, or `NotLoggedIn`
    pub fn require_user(&self) -> JournalResult<User> {
        self.current_user()?.ok_or(JournalError::NotLoggedIn)
    }

    pub fn is_registered(&self, username: &str) -> JournalResult<bool> {
        Ok(self.accounts()?.contains_key(username.trim()))
    }
}
