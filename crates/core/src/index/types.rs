//! Types for the full-text index gateway.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::SortOrder;

/// A phrase-prefix query against the torrent name field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexQuery {
    pub keyword: String,
    pub offset: u32,
    pub limit: u32,
    pub order: SortOrder,
}

/// One document returned by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexHit {
    /// Document id (the torrent info hash).
    pub id: String,
    /// Raw document source; the reconciler pulls `Heat` from it.
    pub source: serde_json::Value,
}

/// A page of hits plus the total match count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexHits {
    pub total: u64,
    pub hits: Vec<IndexHit>,
}

/// Errors that can occur talking to the index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Index API error: {0}")]
    ApiError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Trait for full-text index backends.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Phrase-prefix search on the name field with optional descending sort.
    async fn search(&self, query: &IndexQuery) -> Result<IndexHits, IndexError>;

    /// Total number of documents.
    async fn count(&self) -> Result<u64, IndexError>;

    /// Number of documents whose `CreateTime` is at or after `since`.
    async fn count_created_since(&self, since: DateTime<Local>) -> Result<u64, IndexError>;
}
