//! Join index hits with authoritative store records.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::index::IndexHit;
use crate::store::{RecordStore, StoreError, TorrentRecord};

/// Index-side fields merged into the store record.
#[derive(Debug, Default, Deserialize)]
struct HitPayload {
    #[serde(rename = "Heat", default)]
    heat: i64,
}

/// Reconciled torrents plus what was lost on the way.
#[derive(Debug, Clone, Default)]
pub struct Reconciled {
    /// Records in hit order.
    pub torrents: Vec<TorrentRecord>,
    /// Hits with no usable store record.
    pub dropped: usize,
    /// Hits whose payload could not be decoded (still included, heat 0).
    pub decode_failures: usize,
}

impl Reconciled {
    pub fn is_complete(&self) -> bool {
        self.dropped == 0 && self.decode_failures == 0
    }
}

/// Look up each hit in the store, keeping index order.
///
/// Hits whose record is missing, unreadable or nameless are skipped. The
/// `heat` of each kept record is replaced with the value from the hit.
pub fn reconcile(store: &dyn RecordStore, hits: &[IndexHit]) -> Reconciled {
    let mut out = Reconciled {
        torrents: Vec::with_capacity(hits.len()),
        ..Default::default()
    };

    for hit in hits {
        let mut record = match store.get_torrent(&hit.id) {
            Ok(record) => record,
            Err(StoreError::NotFound(_)) => {
                debug!(id = %hit.id, "Index hit has no store record");
                out.dropped += 1;
                continue;
            }
            Err(e) => {
                warn!(id = %hit.id, error = %e, "Store lookup failed for index hit");
                out.dropped += 1;
                continue;
            }
        };

        if record.name.is_empty() {
            out.dropped += 1;
            continue;
        }

        let payload = match HitPayload::deserialize(&hit.source) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(id = %hit.id, error = %e, "Failed to decode index hit payload");
                out.decode_failures += 1;
                HitPayload::default()
            }
        };

        record.heat = payload.heat;
        out.torrents.push(record);
    }

    out
}
