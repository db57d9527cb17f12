//! Result sink: receives every completed round

use parking_lot::Mutex;

use crate::error::WheelResult;

/// Receives the final (category, item) pair of each completed round
///
/// Called once per round, from the task that settles the item spin.
pub trait ResultSink: Send + Sync {
    fn result_ready(&self, category: &str, item: &str) -> WheelResult<()>;
}

impl<F> ResultSink for F
where
    F: Fn(&str, &str) -> WheelResult<()> + Send + Sync,
{
    fn result_ready(&self, category: &str, item: &str) -> WheelResult<()> {
        self(category, item)
    }
}

/// Sink that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ResultSink for LogSink {
    fn result_ready(&self, category: &str, item: &str) -> WheelResult<()> {
        log::info!("[Wheel] Result ready: {} / {}", category, item);
        Ok(())
    }
}

/// Sink that keeps results in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    results: Mutex<Vec<(String, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results received so far, oldest first
    pub fn results(&self) -> Vec<(String, String)> {
        self.results.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.results.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.lock().is_empty()
    }
}

impl ResultSink for MemorySink {
    fn result_ready(&self, category: &str, item: &str) -> WheelResult<()> {
        self.results
            .lock()
            .push((category.to_string(), item.to_string()));
        Ok(())
    }
}
