//! Full-text index abstraction.
//!
//! This module provides a `SearchIndex` trait for the external torrent index
//! and an Elasticsearch implementation.

mod elastic;
mod types;

pub use elastic::ElasticIndex;
pub use types::*;
