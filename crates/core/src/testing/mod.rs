//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external collaborator
//! traits, allowing the search pipeline and HTTP layer to be tested without
//! an Elasticsearch cluster or database.
//!
//! # Example
//!
//! ```rust,ignore
//! use bttrove_core::testing::{fixtures, MockIndex, MockStore};
//!
//! let index = MockIndex::new();
//! let store = MockStore::new();
//!
//! store.insert(fixtures::torrent_record("abc", "Some Linux ISO", 0));
//! index.set_hits(1, vec![fixtures::hit("abc", 12)]);
//! ```

mod mock_index;
mod mock_store;

pub use mock_index::MockIndex;
pub use mock_store::MockStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use crate::index::IndexHit;
    use crate::store::{TorrentFile, TorrentRecord};

    /// Create a test torrent record with reasonable defaults.
    ///
    /// `heat` is the value stored in the record, which searches replace with
    /// the index-side value.
    pub fn torrent_record(infohash: &str, name: &str, heat: i64) -> TorrentRecord {
        TorrentRecord {
            infohash: infohash.to_string(),
            name: name.to_string(),
            create_time: Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap(),
            length: 1024 * 1024 * 100, // 100 MB
            file_count: 1,
            files: vec![TorrentFile {
                name: format!("{}.bin", name),
                length: 1024 * 1024 * 100,
            }],
            heat,
        }
    }

    /// Create an index hit carrying a `Heat` payload.
    pub fn hit(id: &str, heat: i64) -> IndexHit {
        IndexHit {
            id: id.to_string(),
            source: json!({ "Name": id, "Heat": heat }),
        }
    }
}
