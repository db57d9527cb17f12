//! Result sink that journals every finished round
//!
//! Renders the card, stamps a record and prepends it to the player's
//! history. Plugs into the stage machine as its `ResultSink`.

use std::sync::Arc;

use parking_lot::Mutex;
use sw_wheel::{ResultSink, WheelError, WheelResult};

use crate::error::JournalResult;
use crate::history::{HistoryBook, ResultRecord, format_date};
use crate::render::{CardRenderer, ResultCard, ResultRenderer};
use crate::store::SharedStore;

pub struct JournalSink {
    username: String,
    history: HistoryBook,
    renderer: Arc<dyn ResultRenderer>,
    last: Mutex<Option<ResultRecord>>,
}

impl JournalSink {
    /// Sink for `username` with the default SVG card
    pub fn new(store: SharedStore, username: &str) -> Self {
        Self {
            username: username.to_string(),
            history: HistoryBook::new(store, username),
            renderer: Arc::new(CardRenderer::default()),
            last: Mutex::new(None),
        }
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn ResultRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.history = self.history.with_limit(limit);
        self
    }

    pub fn history(&self) -> &HistoryBook {
        &self.history
    }

    /// Record written for the latest round
    pub fn last_record(&self) -> Option<ResultRecord> {
        self.last.lock().clone()
    }

    fn record(&self, category: &str, item: &str) -> JournalResult<ResultRecord> {
        let now = chrono::Local::now();
        let date_str = format_date(&now);
        let image = self.renderer.render(&ResultCard {
            username: &self.username,
            category,
            item,
            date_str: &date_str,
        })?;

        let record = ResultRecord::at(now, category, item, image);
        self.history.prepend(record.clone())?;
        log::info!(
            "[Journal] Saved {} / {} for {} ({})",
            category,
            item,
            self.username,
            record.id
        );
        Ok(record)
    }
}

impl ResultSink for JournalSink {
    fn result_ready(&self, category: &str, item: &str) -> WheelResult<()> {
        let result = self.record(category, item);
        let mut last = self.last.lock();
        match result {
            Ok(record) => {
                *last = Some(record);
                Ok(())
            }
            Err(e) => {
                // A failed round must not leave the previous record looking current
                *last = None;
                Err(WheelError::Sink(e.to_string()))
            }
        }
    }
}
