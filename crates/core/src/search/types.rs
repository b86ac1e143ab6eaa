//! Types for the keyword search pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::index::IndexError;
use crate::query::SortOrder;
use crate::store::TorrentRecord;

/// A normalized search as seen by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    /// 1-based; values outside `1..=MAX_PAGE` are clamped when searching.
    pub page: u32,
    pub order: SortOrder,
    /// Caller address, recorded in history.
    pub origin: String,
}

/// One page of reconciled results.
///
/// Serialized as `{"Count": .., "Torrent": [..]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(rename = "Count")]
    pub total_count: u64,
    #[serde(rename = "Torrent")]
    pub torrents: Vec<TorrentRecord>,
}

/// Why a keyword was not searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    Blocked,
    NotAllowed,
    /// Demo mode with nothing to substitute.
    NoRecommendations,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::Blocked => "blocked",
            Rejection::NotAllowed => "not_allowed",
            Rejection::NoRecommendations => "no_recommendations",
        }
    }
}

/// Result of a keyword search that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The index matched at least one document.
    Found(SearchPage),
    /// The index matched nothing.
    Empty,
    Rejected(Rejection),
}

impl SearchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            SearchOutcome::Found(_) => "found",
            SearchOutcome::Empty => "empty",
            SearchOutcome::Rejected(r) => r.as_str(),
        }
    }

    /// The page to send to the caller; every non-found outcome is an
    /// empty page.
    pub fn into_page(self) -> SearchPage {
        match self {
            SearchOutcome::Found(page) => page,
            SearchOutcome::Empty | SearchOutcome::Rejected(_) => SearchPage::default(),
        }
    }
}

/// Errors that end a search request.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search index unavailable: {0}")]
    Unavailable(#[from] IndexError),
}
