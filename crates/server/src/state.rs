use std::sync::Arc;

use bttrove_core::{
    Config, KeywordPicker, ModerationLists, RecordStore, SanitizedConfig, SearchIndex,
    SearchService, TrendLists,
};

/// Shared application state
pub struct AppState {
    config: Config,
    search: SearchService,
    index: Arc<dyn SearchIndex>,
    store: Arc<dyn RecordStore>,
    trends: TrendLists,
}

impl AppState {
    pub fn new(
        config: Config,
        index: Arc<dyn SearchIndex>,
        store: Arc<dyn RecordStore>,
        moderation: Arc<dyn ModerationLists>,
        trends: TrendLists,
    ) -> Self {
        let search = SearchService::new(
            Arc::clone(&index),
            Arc::clone(&store),
            moderation,
            config.search.demo,
        );

        Self {
            config,
            search,
            index,
            store,
            trends,
        }
    }

    /// Replace the demo-mode keyword picker.
    pub fn with_picker(mut self, picker: Arc<dyn KeywordPicker>) -> Self {
        self.search = self.search.with_picker(picker);
        self
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn search(&self) -> &SearchService {
        &self.search
    }

    pub fn index(&self) -> &dyn SearchIndex {
        self.index.as_ref()
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    pub fn trends(&self) -> &TrendLists {
        &self.trends
    }
}
