//! Types owned by the record store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical metadata for one torrent, keyed by info hash.
///
/// `heat` is the only field the search path touches: it is overwritten with
/// the index-side value on the copy returned to callers and never written
/// back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TorrentRecord {
    /// Info hash (lowercase hex), also the index document id.
    pub infohash: String,
    pub name: String,
    pub create_time: DateTime<Utc>,
    /// Total size in bytes.
    pub length: i64,
    pub file_count: i64,
    #[serde(default)]
    pub files: Vec<TorrentFile>,
    #[serde(default)]
    pub heat: i64,
}

/// A file within a torrent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TorrentFile {
    pub name: String,
    pub length: i64,
}

/// One logged search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub keyword: String,
    /// Caller address (`ip:port`).
    pub origin: String,
    pub created_at: DateTime<Utc>,
}

/// Window a trend list was computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendPeriod {
    Week,
    Month,
}

impl TrendPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendPeriod::Week => "week",
            TrendPeriod::Month => "month",
        }
    }
}

/// A trending keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrendItem {
    pub keyword: String,
    pub heat: i64,
}

/// Raw moderation patterns as stored.
#[derive(Debug, Clone, Default)]
pub struct KeywordPatterns {
    pub block: Vec<String>,
    pub allow: Vec<String>,
}

/// Errors for record store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
