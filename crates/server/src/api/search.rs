//! Keyword search handler.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bttrove_core::{normalize, SearchPage, SearchRequest};

use super::middleware::RemoteOrigin;
use crate::state::AppState;

/// Raw `/list` parameters. Kept as strings so malformed values normalize
/// instead of rejecting the request.
#[derive(Debug, Default)]
pub struct ListParams {
    pub keyword: Option<String>,
    pub page: Option<String>,
    pub order: Option<String>,
}

impl ListParams {
    /// Collect parameters from decoded query pairs. A repeated key keeps its
    /// first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "keyword" => &mut params.keyword,
                "page" => &mut params.page,
                "order" => &mut params.order,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// GET /list
///
/// Search torrents by keyword. An empty keyword gets an empty body;
/// rejected keywords get an empty page; an index failure gets a 500 with an
/// empty page.
pub async fn list(
    State(state): State<Arc<AppState>>,
    RemoteOrigin(origin): RemoteOrigin,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    let params = ListParams::from_pairs(pairs);
    let Some(query) = normalize(
        params.keyword.as_deref(),
        params.page.as_deref(),
        params.order.as_deref(),
    ) else {
        return StatusCode::OK.into_response();
    };

    let request = SearchRequest {
        keyword: query.keyword,
        page: query.page,
        order: query.order,
        origin,
    };

    match state.search().search(&request).await {
        Ok(outcome) => Json(outcome.into_page()).into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, Json(SearchPage::default())).into_response(),
    }
}
