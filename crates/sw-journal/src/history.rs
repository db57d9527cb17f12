//! Result history
//!
//! One record per completed round, newest first. Records are never edited;
//! they can only be removed by id.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};
use crate::keys::history_key;
use crate::render::RenderedArtifact;
use crate::store::{SharedStore, load_json, save_json};

/// Default cap on records per player (0 = keep every record)
pub const DEFAULT_HISTORY_LIMIT: usize = 0;

/// Human-readable stamp, e.g. `2026/10/17 9:05`
pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%Y/%-m/%-d %-H:%M").to_string()
}

/// Outcome of one completed round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
    pub date_str: String,
    pub category: String,
    pub item: String,
    pub image: RenderedArtifact,
}

impl ResultRecord {
    /// New record stamped with the local time
    pub fn new(category: &str, item: &str, image: RenderedArtifact) -> Self {
        Self::at(Local::now(), category, item, image)
    }

    pub fn at(now: DateTime<Local>, category: &str, item: &str, image: RenderedArtifact) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now.timestamp_millis(),
            date_str: format_date(&now),
            category: category.to_string(),
            item: item.to_string(),
            image,
        }
    }
}

/// A player's history in the store
#[derive(Clone)]
pub struct HistoryBook {
    store: SharedStore,
    key: String,
    limit: usize,
}

impl HistoryBook {
    pub fn new(store: SharedStore, username: &str) -> Self {
        Self {
            store,
            key: history_key(username),
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Cap on stored records (0 = unlimited)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// All records, newest first
    pub fn records(&self) -> JournalResult<Vec<ResultRecord>> {
        Ok(load_json(self.store.as_ref(), &self.key)?.unwrap_or_default())
    }

    fn save(&self, records: &[ResultRecord]) -> JournalResult<()> {
        save_json(self.store.as_ref(), &self.key, records)
    }

    pub fn len(&self) -> JournalResult<usize> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> JournalResult<bool> {
        Ok(self.records()?.is_empty())
    }

    /// Add a record at the front, dropping the oldest beyond the limit
    pub fn prepend(&self, record: ResultRecord) -> JournalResult<()> {
        let mut records = self.records()?;
        records.insert(0, record);
        if self.limit > 0 && records.len() > self.limit {
            let dropped = records.len() - self.limit;
            records.truncate(self.limit);
            log::debug!("[Journal] Dropped {} old record(s)", dropped);
        }
        self.save(&records)
    }

    pub fn get(&self, id: &str) -> JournalResult<Option<ResultRecord>> {
        Ok(self.records()?.into_iter().find(|r| r.id == id))
    }

    /// Remove a record by id, returning it
    pub fn remove(&self, id: &str) -> JournalResult<ResultRecord> {
        let mut records = self.records()?;
        let idx = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| JournalError::RecordNotFound(id.to_string()))?;
        let removed = records.remove(idx);
        self.save(&records)?;
        Ok(removed)
    }

    pub fn clear(&self) -> JournalResult<()> {
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn art() -> RenderedArtifact {
        RenderedArtifact {
            media_type: "text/plain".into(),
            body: "card".into(),
        }
    }

    #[test]
    fn test_format_date() {
        let at = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(format_date(&at), "2026/3/7 9:05");
    }

    #[test]
    fn test_record_json_shape() {
        let record = ResultRecord::new("Food", "Sushi", art());
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("dateStr").is_some());
        assert_eq!(json["category"], "Food");
        assert_eq!(json["image"]["media_type"], "text/plain");
    }

    #[test]
    fn test_newest_first_and_remove() {
        let book = HistoryBook::new(MemoryStore::shared(), "mia");
        assert!(book.is_empty().unwrap());

        let first = ResultRecord::new("Food", "Sushi", art());
        let second = ResultRecord::new("Relax", "Nap", art());
        book.prepend(first.clone()).unwrap();
        book.prepend(second.clone()).unwrap();

        let records = book.records().unwrap();
        assert_eq!(records, vec![second.clone(), first.clone()]);

        assert_eq!(book.remove(&first.id).unwrap(), first);
        assert!(matches!(
            book.remove(&first.id),
            Err(JournalError::RecordNotFound(_))
        ));
        assert_eq!(book.get(&second.id).unwrap(), Some(second));
        assert_eq!(book.len().unwrap(), 1);
    }

    #[test]
    fn test_limit_drops_oldest() {
        let book = HistoryBook::new(MemoryStore::shared(), "mia").with_limit(2);
        for item in ["a", "b", "c"] {
            book.prepend(ResultRecord::new("Cat", item, art())).unwrap();
        }
        let items: Vec<_> = book.records().unwrap().into_iter().map(|r| r.item).collect();
        assert_eq!(items, vec!["c", "b"]);
    }

    #[test]
    fn test_default_keeps_every_record() {
        let book = HistoryBook::new(MemoryStore::shared(), "mia");
        for n in 0..250 {
            book.prepend(ResultRecord::new("Cat", &n.to_string(), art())).unwrap();
        }
        let records = book.records().unwrap();
        assert_eq!(records.len(), 250);
        assert_eq!(records[0].item, "249");
        assert_eq!(records[249].item, "0");
    }

    #[test]
    fn test_histories_are_per_player() {
        let store = MemoryStore::shared();
        let mia = HistoryBook::new(store.clone(), "mia");
        let leo = HistoryBook::new(store, "leo");
        mia.prepend(ResultRecord::new("Food", "Sushi", art())).unwrap();
        assert_eq!(mia.len().unwrap(), 1);
        assert!(leo.is_empty().unwrap());
    }
}
