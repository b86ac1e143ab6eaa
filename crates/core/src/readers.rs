//! Read paths outside the search pipeline: trends, recommendations,
//! index counters and torrent detail.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::warn;

use crate::index::SearchIndex;
use crate::metrics::observe_external;
use crate::store::{RecordStore, StoreError, TorrentRecord, TrendItem, TrendPeriod};

/// Week and month trend lists, loaded once at startup.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrendLists {
    week: Vec<TrendItem>,
    month: Vec<TrendItem>,
}

impl TrendLists {
    pub fn new(week: Vec<TrendItem>, month: Vec<TrendItem>) -> Self {
        Self { week, month }
    }

    /// Load both lists from the store. A list that fails to load is empty.
    pub fn load(store: &dyn RecordStore) -> Self {
        let load = |period: TrendPeriod| {
            store.trends(period).unwrap_or_else(|e| {
                warn!(period = period.as_str(), error = %e, "Failed to load trend list");
                Vec::new()
            })
        };

        Self {
            week: load(TrendPeriod::Week),
            month: load(TrendPeriod::Month),
        }
    }

    /// `"week"` selects the week list; any other value the month list.
    pub fn select(&self, kind: Option<&str>) -> &[TrendItem] {
        match kind {
            Some("week") => &self.week,
            _ => &self.month,
        }
    }
}

/// A recommendation with its 1-based display id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(rename = "ID")]
    pub id: usize,
    #[serde(rename = "Name")]
    pub name: String,
}

/// The recommendation list with display ids.
pub fn recommendations(store: &dyn RecordStore) -> Result<Vec<Recommendation>, StoreError> {
    Ok(store
        .recommendations()?
        .into_iter()
        .enumerate()
        .map(|(i, name)| Recommendation { id: i + 1, name })
        .collect())
}

/// Torrent detail by info hash; `None` when missing or unreadable.
pub fn torrent_detail(store: &dyn RecordStore, infohash: &str) -> Option<TorrentRecord> {
    match store.get_torrent(infohash) {
        Ok(record) => Some(record),
        Err(StoreError::NotFound(_)) => None,
        Err(e) => {
            warn!(infohash = infohash, error = %e, "Failed to load torrent detail");
            None
        }
    }
}

/// Index document counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCounts {
    #[serde(rename = "CountTorrent")]
    pub total: u64,
    #[serde(rename = "TodayStoreTorrent")]
    pub today: u64,
}

/// Counters plus whether every count succeeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub counts: IndexCounts,
    pub complete: bool,
}

/// Start of the current local day.
pub fn local_midnight(now: DateTime<Local>) -> DateTime<Local> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| Local.from_local_datetime(&midnight).earliest())
        .unwrap_or(now)
}

/// Count all documents, then documents created since local midnight.
///
/// The first failure stops counting; fields not reached stay zero.
pub async fn index_stats(index: &dyn SearchIndex) -> IndexStats {
    let mut stats = IndexStats::default();

    let start = Instant::now();
    let total = index.count().await;
    observe_external(index.name(), "count", start.elapsed().as_secs_f64(), total.is_ok());
    match total {
        Ok(total) => stats.counts.total = total,
        Err(e) => {
            warn!(error = %e, "Failed to count index documents");
            return stats;
        }
    }

    let start = Instant::now();
    let today = index.count_created_since(local_midnight(Local::now())).await;
    observe_external(
        index.name(),
        "count_since",
        start.elapsed().as_secs_f64(),
        today.is_ok(),
    );
    match today {
        Ok(today) => stats.counts.today = today,
        Err(e) => {
            warn!(error = %e, "Failed to count today's index documents");
            return stats;
        }
    }

    stats.complete = true;
    stats
}
