//! Per-player category catalogs

use sw_wheel::CategoryMap;

use crate::error::JournalResult;
use crate::keys::wheel_data_key;
use crate::store::{SharedStore, load_json, save_json};

/// Loads and saves each player's catalog
#[derive(Clone)]
pub struct CatalogStore {
    store: SharedStore,
}

impl CatalogStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Saved catalog, or the starter catalog for a new player
    pub fn load(&self, username: &str) -> JournalResult<CategoryMap> {
        match load_json(self.store.as_ref(), &wheel_data_key(username))? {
            Some(map) => Ok(map),
            None => {
                log::debug!("[Journal] No catalog for {}, using starter", username);
                Ok(CategoryMap::starter())
            }
        }
    }

    pub fn save(&self, username: &str, catalog: &CategoryMap) -> JournalResult<()> {
        save_json(self.store.as_ref(), &wheel_data_key(username), catalog)
    }

    /// Forget a player's edits
    pub fn reset(&self, username: &str) -> JournalResult<()> {
        self.store.remove(&wheel_data_key(username))
    }
}
