//! Mock search index for testing.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::index::{IndexError, IndexHit, IndexHits, IndexQuery, SearchIndex};

/// Mock implementation of the SearchIndex trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable hits and counts
/// - Record queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use bttrove_core::testing::{MockIndex, fixtures};
///
/// let index = MockIndex::new();
/// index.set_hits(2, vec![fixtures::hit("aaa", 3), fixtures::hit("bbb", 1)]);
///
/// // ... run a search ...
///
/// let queries = index.recorded_queries();
/// assert_eq!(queries[0].offset, 0);
/// ```
#[derive(Debug, Default)]
pub struct MockIndex {
    hits: Mutex<IndexHits>,
    queries: Mutex<Vec<IndexQuery>>,
    /// If set, the next search fails with this error.
    next_error: Mutex<Option<IndexError>>,
    counts: Mutex<(u64, u64)>,
    fail_count: AtomicBool,
    fail_count_since: AtomicBool,
}

impl MockIndex {
    /// Create a new mock index with no hits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hits returned by every subsequent search.
    pub fn set_hits(&self, total: u64, hits: Vec<IndexHit>) {
        *self.hits.lock().unwrap() = IndexHits { total, hits };
    }

    /// Configure the next search to fail with the given error.
    pub fn set_next_error(&self, error: IndexError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Set the values returned by `count` and `count_created_since`.
    pub fn set_counts(&self, total: u64, today: u64) {
        *self.counts.lock().unwrap() = (total, today);
    }

    /// Make `count` fail.
    pub fn fail_counts(&self, fail: bool) {
        self.fail_count.store(fail, Ordering::SeqCst);
    }

    /// Make `count_created_since` fail.
    pub fn fail_count_since(&self, fail: bool) {
        self.fail_count_since.store(fail, Ordering::SeqCst);
    }

    /// Get recorded search queries.
    pub fn recorded_queries(&self) -> Vec<IndexQuery> {
        self.queries.lock().unwrap().clone()
    }

    /// Get the number of searches performed.
    pub fn search_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait]
impl SearchIndex for MockIndex {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &IndexQuery) -> Result<IndexHits, IndexError> {
        self.queries.lock().unwrap().push(query.clone());

        if let Some(err) = self.next_error.lock().unwrap().take() {
            return Err(err);
        }

        Ok(self.hits.lock().unwrap().clone())
    }

    async fn count(&self) -> Result<u64, IndexError> {
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(IndexError::ConnectionFailed("mock count failure".to_string()));
        }
        Ok(self.counts.lock().unwrap().0)
    }

    async fn count_created_since(&self, _since: DateTime<Local>) -> Result<u64, IndexError> {
        if self.fail_count_since.load(Ordering::SeqCst) {
            return Err(IndexError::Timeout);
        }
        Ok(self.counts.lock().unwrap().1)
    }
}
