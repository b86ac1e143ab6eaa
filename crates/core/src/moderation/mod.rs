//! Keyword moderation.
//!
//! A keyword is servable only when it matches no block pattern and at least
//! one allow pattern. An empty allow list therefore rejects everything.

mod lists;

pub use lists::KeywordLists;

use serde::Serialize;
use tracing::info;

/// Source of block/allow decisions for a keyword.
pub trait ModerationLists: Send + Sync {
    fn in_block_list(&self, keyword: &str) -> bool;
    fn in_allow_list(&self, keyword: &str) -> bool;
}

/// Result of classifying a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Allowed,
    Blocked,
    /// Matched no allow pattern.
    NotAllowed,
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allowed)
    }
}

/// Classify `keyword` against the lists. Rejections are logged with the
/// caller's origin.
pub fn classify(lists: &dyn ModerationLists, keyword: &str, origin: &str) -> Verdict {
    if lists.in_block_list(keyword) {
        info!(keyword = keyword, origin = origin, "Keyword is in block list");
        return Verdict::Blocked;
    }

    if !lists.in_allow_list(keyword) {
        info!(keyword = keyword, origin = origin, "Keyword is not in allow list");
        return Verdict::NotAllowed;
    }

    Verdict::Allowed
}
