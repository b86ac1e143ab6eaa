//! Common test utilities for API testing with mocks.
//!
//! This module provides a test fixture that creates an in-process router
//! with mock collaborators injected, so the HTTP contract can be exercised
//! without Elasticsearch or a database file.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use bttrove_core::{
    search::FixedPicker,
    testing::{MockIndex, MockStore},
    Config, KeywordLists, SearchConfig, TrendLists,
};
use bttrove_server::state::AppState;

/// Re-export fixtures for test convenience
pub use bttrove_core::testing::fixtures;

/// Test fixture for API testing with mock dependencies.
///
/// The store is seeded by `TestConfig::seed` before the trend lists are
/// loaded, mirroring startup where trends are read once.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     fixture.index.set_hits(1, vec![fixtures::hit("aaa", 3)]);
///
///     let response = fixture.get("/list?keyword=ubuntu").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock index - configure hits, counts and failures
    pub index: Arc<MockIndex>,
    /// Mock store - records, history, recommendations
    pub store: Arc<MockStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    /// Raw body; empty for "empty body" responses.
    pub raw: Vec<u8>,
    /// Parsed body, `Value::Null` when empty or not JSON.
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture that allows every keyword.
    pub fn new() -> Self {
        Self::with_config(TestConfig::default())
    }

    /// Create a test fixture with custom configuration.
    pub fn with_config(test_config: TestConfig) -> Self {
        let index = Arc::new(MockIndex::new());
        let store = Arc::new(MockStore::new());

        if let Some(seed) = test_config.seed {
            seed(&store);
        }

        let config = Config {
            search: SearchConfig {
                demo: test_config.demo,
            },
            ..Default::default()
        };

        let lists = KeywordLists::new(test_config.block, test_config.allow);
        let trends = TrendLists::load(store.as_ref());

        let mut state = AppState::new(
            config,
            Arc::clone(&index) as Arc<dyn bttrove_core::SearchIndex>,
            Arc::clone(&store) as Arc<dyn bttrove_core::RecordStore>,
            Arc::new(lists),
            trends,
        );
        if let Some(position) = test_config.pick {
            state = state.with_picker(Arc::new(FixedPicker(position)));
        }

        let router = bttrove_server::api::create_router(Arc::new(state));

        Self {
            router,
            index,
            store,
        }
    }

    /// Send a GET request to the test router.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            raw: body_bytes.to_vec(),
            body,
        }
    }
}

/// Configuration for test fixture.
pub struct TestConfig {
    /// Serve searches from recommendations only
    pub demo: bool,
    pub block: Vec<String>,
    pub allow: Vec<String>,
    /// Fixed demo-mode pick instead of random
    pub pick: Option<usize>,
    /// Populate the store before trend lists are loaded
    pub seed: Option<Box<dyn FnOnce(&MockStore)>>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            demo: false,
            block: Vec::new(),
            allow: vec![".*".to_string()],
            pick: None,
            seed: None,
        }
    }
}

impl TestConfig {
    /// Moderation with the given block and allow patterns.
    pub fn with_lists(block: &[&str], allow: &[&str]) -> Self {
        Self {
            block: block.iter().map(|p| p.to_string()).collect(),
            allow: allow.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Demo mode with the given recommendation list.
    pub fn demo(recommendations: &'static [&'static str]) -> Self {
        Self {
            demo: true,
            allow: Vec::new(),
            seed: Some(Box::new(move |store: &MockStore| {
                store.set_recommendations(recommendations)
            })),
            ..Default::default()
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a response is an empty page.
#[macro_export]
macro_rules! assert_empty_page {
    ($response:expr) => {
        assert_eq!($response.body["Count"], 0, "Body: {}", $response.body);
        assert_eq!(
            $response.body["Torrent"],
            serde_json::json!([]),
            "Body: {}",
            $response.body
        );
    };
}
