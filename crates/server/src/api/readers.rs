//! Detail, recommendation, trend and index state handlers.
//!
//! None of these produce an error payload: failures degrade to an empty
//! body or zeroed fields.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bttrove_core::{index_stats, recommendations, torrent_detail, IndexCounts, TrendItem};
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DetailParams {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendParams {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// GET /detail?id={infohash}
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DetailParams>,
) -> Response {
    let id = params.id.unwrap_or_default();
    if id.is_empty() {
        return StatusCode::OK.into_response();
    }

    match torrent_detail(state.store(), &id) {
        Some(record) => Json(record).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// GET /recommend
pub async fn recommend(State(state): State<Arc<AppState>>) -> Response {
    match recommendations(state.store()) {
        Ok(list) => Json(list).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load recommendations");
            StatusCode::OK.into_response()
        }
    }
}

/// GET /trend?type=week|month
pub async fn trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TrendParams>,
) -> Json<Vec<TrendItem>> {
    Json(state.trends().select(params.kind.as_deref()).to_vec())
}

/// GET /state
pub async fn index_state(State(state): State<Arc<AppState>>) -> Json<IndexCounts> {
    let stats = index_stats(state.index()).await;
    Json(stats.counts)
}
