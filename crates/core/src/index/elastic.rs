//! Elasticsearch index backend implementation.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::IndexConfig;

use super::{IndexError, IndexHit, IndexHits, IndexQuery, SearchIndex};

/// Field the phrase-prefix query runs against.
const NAME_FIELD: &str = "Name";

/// Layout of `CreateTime` in index documents.
const CREATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const CREATE_TIME_ES_FORMAT: &str = "yyyy-MM-dd HH:mm:ss";

/// Elasticsearch REST backend.
pub struct ElasticIndex {
    client: Client,
    config: IndexConfig,
}

impl ElasticIndex {
    /// Create a new ElasticIndex with the given configuration.
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| IndexError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.url.trim_end_matches('/'),
            urlencoding::encode(&self.config.name),
            action
        )
    }

    /// Build the `_search` request body.
    fn search_body(query: &IndexQuery) -> Value {
        let mut body = json!({
            "query": {
                "match_phrase_prefix": {
                    NAME_FIELD: query.keyword,
                }
            },
            "from": query.offset,
            "size": query.limit,
        });

        if let Some(field) = query.order.field() {
            body["sort"] = json!([{ field: { "order": "desc" } }]);
        }

        body
    }

    fn created_since_body(since: DateTime<Local>) -> Value {
        json!({
            "query": {
                "range": {
                    "CreateTime": {
                        "gte": since.format(CREATE_TIME_FORMAT).to_string(),
                        "format": CREATE_TIME_ES_FORMAT,
                    }
                }
            }
        })
    }

    async fn post_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &Value,
    ) -> Result<T, IndexError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(map_request_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::ApiError(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| IndexError::ApiError(format!("Failed to parse response: {}", e)))
    }
}

fn map_request_error(e: reqwest::Error) -> IndexError {
    if e.is_timeout() {
        IndexError::Timeout
    } else if e.is_connect() {
        IndexError::ConnectionFailed(e.to_string())
    } else {
        IndexError::ApiError(e.to_string())
    }
}

#[async_trait]
impl SearchIndex for ElasticIndex {
    fn name(&self) -> &str {
        "elasticsearch"
    }

    async fn search(&self, query: &IndexQuery) -> Result<IndexHits, IndexError> {
        let url = self.endpoint("_search");
        let body = Self::search_body(query);
        debug!(keyword = %query.keyword, offset = query.offset, order = ?query.order, "Searching index");

        let response: EsSearchResponse = self.post_json(&url, &body).await?;

        debug!(
            total = response.hits.total.value(),
            returned = response.hits.hits.len(),
            "Index search complete"
        );

        Ok(IndexHits {
            total: response.hits.total.value(),
            hits: response
                .hits
                .hits
                .into_iter()
                .map(|h| IndexHit {
                    id: h.id,
                    source: h.source,
                })
                .collect(),
        })
    }

    async fn count(&self) -> Result<u64, IndexError> {
        let url = self.endpoint("_count");
        let response: EsCountResponse = self
            .post_json(&url, &json!({ "query": { "match_all": {} } }))
            .await?;
        Ok(response.count)
    }

    async fn count_created_since(&self, since: DateTime<Local>) -> Result<u64, IndexError> {
        let url = self.endpoint("_count");
        let response: EsCountResponse = self
            .post_json(&url, &Self::created_since_body(since))
            .await?;
        Ok(response.count)
    }
}

// ============================================================================
// Elasticsearch API response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct EsSearchResponse {
    hits: EsHits,
}

#[derive(Debug, Deserialize)]
struct EsHits {
    total: EsTotal,
    #[serde(default)]
    hits: Vec<EsHit>,
}

/// `hits.total` is a number before 7.0 and an object afterwards.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EsTotal {
    Count(u64),
    Object { value: u64 },
}

impl EsTotal {
    fn value(&self) -> u64 {
        match self {
            EsTotal::Count(n) => *n,
            EsTotal::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EsHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Value,
}

#[derive(Debug, Deserialize)]
struct EsCountResponse {
    count: u64,
}
