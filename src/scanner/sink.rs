//! Result sinks shared by scan workers

use crate::models::ScanResult;
use std::sync::{Arc, Mutex};

/// Destination for scan results. Appends may come from any worker.
pub trait ResultSink: Send + Sync {
    fn append(&self, result: ScanResult);
}

/// Thread-safe in-memory result list
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    results: Arc<Mutex<Vec<ScanResult>>>,
}

impl MemorySink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every result appended so far
    pub fn results(&self) -> Vec<ScanResult> {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results.clone()
    }

    /// Takes the collected results, leaving the sink empty
    pub fn take(&self) -> Vec<ScanResult> {
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut *results)
    }

    pub fn len(&self) -> usize {
        let results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResultSink for MemorySink {
    fn append(&self, result: ScanResult) {
        let mut results = self.results.lock().unwrap_or_else(|e| e.into_inner());
        results.push(result);
    }
}
