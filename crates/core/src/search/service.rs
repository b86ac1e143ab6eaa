//! Keyword search orchestration.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::index::{IndexQuery, SearchIndex};
use crate::metrics::{
    observe_external, DEMO_SUBSTITUTIONS, HISTORY_WRITE_FAILURES, RECONCILE_DECODE_FAILURES,
    RECONCILE_DROPPED, SEARCHES_TOTAL, SEARCH_RESULTS,
};
use crate::moderation::{classify, ModerationLists, Verdict};
use crate::query::{page_offset, PAGE_SIZE};
use crate::store::RecordStore;

use super::picker::{KeywordPicker, RandomPicker};
use super::reconcile::reconcile;
use super::types::{Rejection, SearchError, SearchOutcome, SearchPage, SearchRequest};

/// Runs one keyword search end to end: history, admission, index query,
/// reconciliation.
pub struct SearchService {
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn RecordStore>,
    moderation: Arc<dyn ModerationLists>,
    picker: Arc<dyn KeywordPicker>,
    demo: bool,
}

impl SearchService {
    pub fn new(
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn RecordStore>,
        moderation: Arc<dyn ModerationLists>,
        demo: bool,
    ) -> Self {
        Self {
            index,
            store,
            moderation,
            picker: Arc::new(RandomPicker),
            demo,
        }
    }

    /// Replace the demo-mode keyword picker.
    pub fn with_picker(mut self, picker: Arc<dyn KeywordPicker>) -> Self {
        self.picker = picker;
        self
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    /// Execute a search.
    ///
    /// History is written for the keyword as received, before any admission
    /// check. Only an index failure is an error; rejections and empty
    /// results are outcomes.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome, SearchError> {
        self.record_history(&request.keyword, &request.origin);

        let keyword = match self.admit(request) {
            Ok(keyword) => keyword,
            Err(rejection) => {
                SEARCHES_TOTAL.with_label_values(&[rejection.as_str()]).inc();
                return Ok(SearchOutcome::Rejected(rejection));
            }
        };

        let query = IndexQuery {
            keyword,
            offset: page_offset(request.page),
            limit: PAGE_SIZE,
            order: request.order,
        };

        let start = Instant::now();
        let result = self.index.search(&query).await;
        observe_external(
            self.index.name(),
            "search",
            start.elapsed().as_secs_f64(),
            result.is_ok(),
        );

        let hits = match result {
            Ok(hits) => hits,
            Err(e) => {
                error!(keyword = %query.keyword, error = %e, "Index search failed");
                SEARCHES_TOTAL.with_label_values(&["unavailable"]).inc();
                return Err(SearchError::Unavailable(e));
            }
        };

        if hits.total == 0 && hits.hits.is_empty() {
            SEARCHES_TOTAL.with_label_values(&["empty"]).inc();
            SEARCH_RESULTS.observe(0.0);
            return Ok(SearchOutcome::Empty);
        }

        let reconciled = reconcile(self.store.as_ref(), &hits.hits);
        if !reconciled.is_complete() {
            debug!(
                keyword = %query.keyword,
                dropped = reconciled.dropped,
                decode_failures = reconciled.decode_failures,
                "Partial reconciliation"
            );
        }
        RECONCILE_DROPPED.inc_by(reconciled.dropped as u64);
        RECONCILE_DECODE_FAILURES.inc_by(reconciled.decode_failures as u64);
        SEARCH_RESULTS.observe(reconciled.torrents.len() as f64);
        SEARCHES_TOTAL.with_label_values(&["found"]).inc();

        Ok(SearchOutcome::Found(SearchPage {
            total_count: hits.total,
            torrents: reconciled.torrents,
        }))
    }

    /// Decide which keyword to send to the index, if any.
    fn admit(&self, request: &SearchRequest) -> Result<String, Rejection> {
        if self.demo {
            return self.demo_keyword(&request.keyword);
        }

        match classify(self.moderation.as_ref(), &request.keyword, &request.origin) {
            Verdict::Allowed => Ok(request.keyword.clone()),
            Verdict::Blocked => Err(Rejection::Blocked),
            Verdict::NotAllowed => Err(Rejection::NotAllowed),
        }
    }

    /// In demo mode only recommended keywords are searched; anything else is
    /// swapped for a recommended one.
    fn demo_keyword(&self, keyword: &str) -> Result<String, Rejection> {
        let recommendations = self.store.recommendations().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load recommendations");
            Vec::new()
        });

        if recommendations.iter().any(|r| r == keyword) {
            return Ok(keyword.to_string());
        }

        if recommendations.is_empty() {
            return Err(Rejection::NoRecommendations);
        }

        let pick = self.picker.pick(recommendations.len()) % recommendations.len();
        let substitute = recommendations[pick].clone();
        info!(keyword = keyword, substitute = %substitute, "Demo mode keyword substitution");
        DEMO_SUBSTITUTIONS.inc();
        Ok(substitute)
    }

    fn record_history(&self, keyword: &str, origin: &str) {
        if let Err(e) = self.store.create_history(keyword, origin) {
            warn!(keyword = keyword, origin = origin, error = %e, "Failed to record search history");
            HISTORY_WRITE_FAILURES.inc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexError;
    use crate::moderation::KeywordLists;
    use crate::query::SortOrder;
    use crate::search::FixedPicker;
    use crate::testing::{fixtures, MockIndex, MockStore};

    struct Harness {
        index: Arc<MockIndex>,
        store: Arc<MockStore>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                index: Arc::new(MockIndex::new()),
                store: Arc::new(MockStore::new()),
            }
        }

        fn service(&self, lists: KeywordLists, demo: bool) -> SearchService {
            SearchService::new(
                Arc::clone(&self.index) as Arc<dyn SearchIndex>,
                Arc::clone(&self.store) as Arc<dyn RecordStore>,
                Arc::new(lists),
                demo,
            )
        }
    }

    fn allow_all() -> KeywordLists {
        KeywordLists::new(vec![], vec![".*".to_string()])
    }

    fn request(keyword: &str, page: u32, order: SortOrder) -> SearchRequest {
        SearchRequest {
            keyword: keyword.to_string(),
            page,
            order,
            origin: "192.0.2.1:40000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_found_page_reconciles_hits() {
        let h = Harness::new();
        h.store.insert(fixtures::torrent_record("a", "ubuntu desktop", 1));
        h.store.insert(fixtures::torrent_record("b", "ubuntu server", 1));
        h.index
            .set_hits(57, vec![fixtures::hit("a", 10), fixtures::hit("b", 20)]);

        let outcome = h
            .service(allow_all(), false)
            .search(&request("ubuntu", 1, SortOrder::Relevance))
            .await
            .unwrap();

        let SearchOutcome::Found(page) = outcome else {
            panic!("expected found outcome");
        };
        assert_eq!(page.total_count, 57);
        assert_eq!(page.torrents.len(), 2);
        assert_eq!(page.torrents[0].heat, 10);
        assert_eq!(page.torrents[1].heat, 20);
    }

    #[tokio::test]
    async fn test_blocked_keyword_is_rejected_without_query() {
        let h = Harness::new();
        let lists = KeywordLists::new(vec!["forbidden".to_string()], vec![".*".to_string()]);
        let service = h.service(lists, false);

        for order in [SortOrder::Relevance, SortOrder::Heat] {
            for page in [1, 5, 20] {
                let outcome = service
                    .search(&request("forbidden stuff", page, order))
                    .await
                    .unwrap();
                assert_eq!(outcome, SearchOutcome::Rejected(Rejection::Blocked));
            }
        }
        assert_eq!(h.index.search_count(), 0);
    }

    #[tokio::test]
    async fn test_keyword_outside_allow_list_is_rejected() {
        let h = Harness::new();
        let lists = KeywordLists::new(vec![], vec!["^linux".to_string()]);

        let outcome = h
            .service(lists, false)
            .search(&request("windows", 1, SortOrder::Relevance))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Rejected(Rejection::NotAllowed));
        assert_eq!(outcome.into_page(), SearchPage::default());
        assert_eq!(h.index.search_count(), 0);
    }

    #[tokio::test]
    async fn test_history_recorded_for_rejected_keyword() {
        let h = Harness::new();
        let lists = KeywordLists::new(vec!["bad".to_string()], vec![]);

        h.service(lists, false)
            .search(&request("bad word", 1, SortOrder::Relevance))
            .await
            .unwrap();

        let history = h.store.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].keyword, "bad word");
        assert_eq!(history[0].origin, "192.0.2.1:40000");
    }

    #[tokio::test]
    async fn test_history_failure_does_not_fail_search() {
        let h = Harness::new();
        h.store.fail_history(true);
        h.store.insert(fixtures::torrent_record("a", "A", 0));
        h.index.set_hits(1, vec![fixtures::hit("a", 1)]);

        let outcome = h
            .service(allow_all(), false)
            .search(&request("a", 1, SortOrder::Relevance))
            .await
            .unwrap();
        assert!(matches!(outcome, SearchOutcome::Found(_)));
    }

    #[tokio::test]
    async fn test_pagination_and_sort_forwarded() {
        let h = Harness::new();
        let service = h.service(allow_all(), false);

        service
            .search(&request("k", 3, SortOrder::Length))
            .await
            .unwrap();

        let queries = h.index.recorded_queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].keyword, "k");
        assert_eq!(queries[0].offset, 40);
        assert_eq!(queries[0].limit, 20);
        assert_eq!(queries[0].order, SortOrder::Length);
    }

    #[tokio::test]
    async fn test_page_beyond_last_is_clamped() {
        let h = Harness::new();
        let service = h.service(allow_all(), false);

        for page in [0, 20, 21, 500, u32::MAX] {
            service
                .search(&request("k", page, SortOrder::Relevance))
                .await
                .unwrap();
        }

        let offsets: Vec<u32> = h.index.recorded_queries().iter().map(|q| q.offset).collect();
        assert_eq!(offsets, vec![0, 380, 380, 380, 380]);
    }

    #[tokio::test]
    async fn test_zero_hits_is_empty_outcome() {
        let h = Harness::new();
        let outcome = h
            .service(allow_all(), false)
            .search(&request("nothing", 1, SortOrder::Relevance))
            .await
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Empty);
    }

    #[tokio::test]
    async fn test_index_failure_is_unavailable() {
        let h = Harness::new();
        h.index
            .set_next_error(IndexError::ConnectionFailed("refused".to_string()));

        let result = h
            .service(allow_all(), false)
            .search(&request("k", 1, SortOrder::Relevance))
            .await;
        assert!(matches!(result, Err(SearchError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_demo_mode_keeps_recommended_keyword() {
        let h = Harness::new();
        h.store.set_recommendations(&["ubuntu", "debian"]);

        // Empty lists would reject everything outside demo mode
        h.service(KeywordLists::default(), true)
            .search(&request("debian", 1, SortOrder::Relevance))
            .await
            .unwrap();

        assert_eq!(h.index.recorded_queries()[0].keyword, "debian");
    }

    #[tokio::test]
    async fn test_demo_mode_substitutes_from_recommendations() {
        let h = Harness::new();
        let recommendations = ["ubuntu", "debian", "arch"];
        h.store.set_recommendations(&recommendations);
        let service = h.service(KeywordLists::default(), true);

        for _ in 0..10 {
            service
                .search(&request("something else", 1, SortOrder::Relevance))
                .await
                .unwrap();
        }

        let queries = h.index.recorded_queries();
        assert_eq!(queries.len(), 10);
        for query in queries {
            assert!(recommendations.contains(&query.keyword.as_str()));
        }
    }

    #[tokio::test]
    async fn test_demo_mode_uses_injected_picker() {
        let h = Harness::new();
        h.store.set_recommendations(&["ubuntu", "debian", "arch"]);

        h.service(KeywordLists::default(), true)
            .with_picker(Arc::new(FixedPicker(2)))
            .search(&request("fedora", 1, SortOrder::Relevance))
            .await
            .unwrap();

        assert_eq!(h.index.recorded_queries()[0].keyword, "arch");
        // History keeps the keyword the caller sent
        assert_eq!(h.store.history()[0].keyword, "fedora");
    }

    #[tokio::test]
    async fn test_demo_mode_without_recommendations_is_rejected() {
        let h = Harness::new();

        let outcome = h
            .service(allow_all(), true)
            .search(&request("anything", 1, SortOrder::Relevance))
            .await
            .unwrap();

        assert_eq!(outcome, SearchOutcome::Rejected(Rejection::NoRecommendations));
        assert_eq!(h.index.search_count(), 0);
    }

    #[tokio::test]
    async fn test_demo_mode_bypasses_block_list() {
        let h = Harness::new();
        h.store.set_recommendations(&["blocked word"]);
        let lists = KeywordLists::new(vec!["blocked".to_string()], vec![]);

        h.service(lists, true)
            .search(&request("blocked word", 1, SortOrder::Relevance))
            .await
            .unwrap();

        assert_eq!(h.index.search_count(), 1);
    }
}
