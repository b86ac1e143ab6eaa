//! Mock record store for testing.

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::store::{
    HistoryEntry, KeywordPatterns, RecordStore, StoreError, TorrentRecord, TrendItem, TrendPeriod,
};

/// In-memory RecordStore with failure injection.
#[derive(Debug, Default)]
pub struct MockStore {
    records: Mutex<HashMap<String, TorrentRecord>>,
    /// Info hashes whose lookup fails with a database error.
    failing: Mutex<HashSet<String>>,
    history: Mutex<Vec<HistoryEntry>>,
    recommendations: Mutex<Vec<String>>,
    trends: Mutex<HashMap<&'static str, Vec<TrendItem>>>,
    patterns: Mutex<KeywordPatterns>,
    fail_history: AtomicBool,
    fail_recommendations: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record.
    pub fn insert(&self, record: TorrentRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.infohash.clone(), record);
    }

    /// Make lookups of `infohash` fail.
    pub fn fail_lookup(&self, infohash: &str) {
        self.failing.lock().unwrap().insert(infohash.to_string());
    }

    pub fn fail_history(&self, fail: bool) {
        self.fail_history.store(fail, Ordering::SeqCst);
    }

    pub fn fail_recommendations(&self, fail: bool) {
        self.fail_recommendations.store(fail, Ordering::SeqCst);
    }

    pub fn set_recommendations(&self, keywords: &[&str]) {
        *self.recommendations.lock().unwrap() = keywords.iter().map(|k| k.to_string()).collect();
    }

    pub fn set_trends(&self, period: TrendPeriod, items: Vec<TrendItem>) {
        self.trends.lock().unwrap().insert(period.as_str(), items);
    }

    pub fn set_patterns(&self, block: &[&str], allow: &[&str]) {
        *self.patterns.lock().unwrap() = KeywordPatterns {
            block: block.iter().map(|p| p.to_string()).collect(),
            allow: allow.iter().map(|p| p.to_string()).collect(),
        };
    }

    /// History entries in insertion order.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().unwrap().clone()
    }
}

impl RecordStore for MockStore {
    fn create_history(&self, keyword: &str, origin: &str) -> Result<(), StoreError> {
        if self.fail_history.load(Ordering::SeqCst) {
            return Err(StoreError::Database("mock history failure".to_string()));
        }
        self.history.lock().unwrap().push(HistoryEntry {
            keyword: keyword.to_string(),
            origin: origin.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    fn recommendations(&self) -> Result<Vec<String>, StoreError> {
        if self.fail_recommendations.load(Ordering::SeqCst) {
            return Err(StoreError::Database("mock recommendations failure".to_string()));
        }
        Ok(self.recommendations.lock().unwrap().clone())
    }

    fn get_torrent(&self, infohash: &str) -> Result<TorrentRecord, StoreError> {
        if self.failing.lock().unwrap().contains(infohash) {
            return Err(StoreError::Database(format!("mock lookup failure: {}", infohash)));
        }
        self.records
            .lock()
            .unwrap()
            .get(infohash)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(infohash.to_string()))
    }

    fn trends(&self, period: TrendPeriod) -> Result<Vec<TrendItem>, StoreError> {
        Ok(self
            .trends
            .lock()
            .unwrap()
            .get(period.as_str())
            .cloned()
            .unwrap_or_default())
    }

    fn keyword_patterns(&self) -> Result<KeywordPatterns, StoreError> {
        Ok(self.patterns.lock().unwrap().clone())
    }
}
