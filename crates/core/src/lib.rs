pub mod config;
pub mod index;
pub mod metrics;
pub mod moderation;
pub mod query;
pub mod readers;
pub mod search;
pub mod store;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    IndexConfig, SanitizedConfig, SearchConfig, ServerConfig,
};
pub use index::{ElasticIndex, IndexError, IndexHit, IndexHits, IndexQuery, SearchIndex};
pub use moderation::{classify, KeywordLists, ModerationLists, Verdict};
pub use query::{normalize, page_offset, NormalizedQuery, SortOrder, MAX_PAGE, PAGE_SIZE};
pub use readers::{
    index_stats, recommendations, torrent_detail, IndexCounts, IndexStats, Recommendation,
    TrendLists,
};
pub use search::{
    KeywordPicker, RandomPicker, Rejection, SearchError, SearchOutcome, SearchPage,
    SearchRequest, SearchService,
};
pub use store::{
    HistoryEntry, KeywordPatterns, RecordStore, SqliteStore, StoreError, TorrentFile,
    TorrentRecord, TrendItem, TrendPeriod,
};
