//! Keyword search pipeline.
//!
//! A request is logged to history, admitted (moderation, or recommendation
//! substitution in demo mode), run against the index, and the hits are
//! reconciled with store records.

mod picker;
mod reconcile;
mod service;
mod types;

pub use picker::{FixedPicker, KeywordPicker, RandomPicker};
pub use reconcile::{reconcile, Reconciled};
pub use service::SearchService;
pub use types::*;
