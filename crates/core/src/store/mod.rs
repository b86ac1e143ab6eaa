//! Record store - canonical torrent metadata, search history, the
//! recommendation list, trend lists and moderation patterns.
//!
//! The search path only reads from the store, except for appending
//! history entries.

mod sqlite;
mod types;

pub use sqlite::SqliteStore;
pub use types::*;

/// Trait for the authoritative record store.
pub trait RecordStore: Send + Sync {
    /// Append a search history entry.
    fn create_history(&self, keyword: &str, origin: &str) -> Result<(), StoreError>;

    /// Recommended keywords, in display order.
    fn recommendations(&self) -> Result<Vec<String>, StoreError>;

    /// Get a torrent by info hash.
    ///
    /// Returns `StoreError::NotFound` when no record exists.
    fn get_torrent(&self, infohash: &str) -> Result<TorrentRecord, StoreError>;

    /// Precomputed trend list for a period.
    fn trends(&self, period: TrendPeriod) -> Result<Vec<TrendItem>, StoreError>;

    /// Block and allow patterns for keyword moderation.
    fn keyword_patterns(&self) -> Result<KeywordPatterns, StoreError>;
}
