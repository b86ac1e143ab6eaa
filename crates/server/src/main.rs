use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bttrove_core::{
    load_config, validate_config, ElasticIndex, KeywordLists, ModerationLists, RecordStore,
    SearchIndex, SqliteStore, TrendLists,
};
use bttrove_server::{api::create_router, state::AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("BTTROVE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;
    info!("Configuration loaded successfully");

    // Record store (history, details, recommendations, lists, trends)
    let store = SqliteStore::new(&config.database.path)
        .with_context(|| format!("Failed to open database at {:?}", config.database.path))?;
    info!("Record store initialized at {:?}", config.database.path);

    // Moderation lists are loaded once and never reloaded
    let patterns = store
        .keyword_patterns()
        .context("Failed to load keyword lists")?;
    let lists = KeywordLists::from_patterns(patterns);
    info!(
        block = lists.block_len(),
        allow = lists.allow_len(),
        "Keyword lists loaded"
    );
    if lists.allow_len() == 0 && !config.search.demo {
        warn!("Allow list is empty: every search keyword will be rejected");
    }

    let trends = TrendLists::load(&store);

    // Search index
    let index = ElasticIndex::new(config.index.clone()).context("Failed to create index client")?;
    info!("Using search index: {} ({})", config.index.name, index.name());

    let store: Arc<dyn RecordStore> = Arc::new(store);
    let index: Arc<dyn SearchIndex> = Arc::new(index);
    let moderation: Arc<dyn ModerationLists> = Arc::new(lists);

    let state = Arc::new(AppState::new(
        config.clone(),
        index,
        store,
        moderation,
        trends,
    ));

    if state.search().is_demo() {
        info!("Demo mode enabled: searches are served from recommendations");
    }
    info!("Effective config: {:?}", state.sanitized_config());

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown; connect info feeds the search history origin
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
