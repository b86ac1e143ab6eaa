//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Keyword searches (outcomes, result sizes)
//! - Result reconciliation and history writes
//! - External services (search index, record store)

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Search Pipeline Metrics
// =============================================================================

/// Keyword searches total by outcome.
pub static SEARCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("bttrove_searches_total", "Total keyword searches"),
        &["outcome"], // "found", "empty", "blocked", "not_allowed", "no_recommendations", "unavailable"
    )
    .unwrap()
});

/// Keywords replaced by a recommendation in demo mode.
pub static DEMO_SUBSTITUTIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bttrove_demo_substitutions_total",
        "Keywords replaced by a random recommendation in demo mode",
    )
    .unwrap()
});

/// Torrents returned per search page.
pub static SEARCH_RESULTS: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new(
            "bttrove_search_results",
            "Number of torrents returned per search page",
        )
        .buckets(vec![0.0, 1.0, 5.0, 10.0, 15.0, 20.0]),
    )
    .unwrap()
});

/// Index hits dropped during reconciliation.
pub static RECONCILE_DROPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bttrove_reconcile_dropped_total",
        "Index hits dropped for lack of a usable store record",
    )
    .unwrap()
});

/// Index hit payloads that failed to decode.
pub static RECONCILE_DECODE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bttrove_reconcile_decode_failures_total",
        "Index hit payloads that could not be decoded",
    )
    .unwrap()
});

/// History writes that failed.
pub static HISTORY_WRITE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "bttrove_history_write_failures_total",
        "Search history entries that could not be stored",
    )
    .unwrap()
});

// =============================================================================
// External Service Metrics
// =============================================================================

/// External service request duration.
pub static EXTERNAL_SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "bttrove_external_service_duration_seconds",
            "Duration of external service calls",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["service", "operation"],
    )
    .unwrap()
});

/// External service requests total.
pub static EXTERNAL_SERVICE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "bttrove_external_service_requests_total",
            "Total external service requests",
        ),
        &["service", "operation", "status"], // status: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Record the result and duration of one external call.
pub fn observe_external(service: &str, operation: &str, seconds: f64, success: bool) {
    EXTERNAL_SERVICE_DURATION
        .with_label_values(&[service, operation])
        .observe(seconds);
    EXTERNAL_SERVICE_REQUESTS
        .with_label_values(&[service, operation, if success { "success" } else { "error" }])
        .inc();
}

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search pipeline
        Box::new(SEARCHES_TOTAL.clone()),
        Box::new(DEMO_SUBSTITUTIONS.clone()),
        Box::new(SEARCH_RESULTS.clone()),
        Box::new(RECONCILE_DROPPED.clone()),
        Box::new(RECONCILE_DECODE_FAILURES.clone()),
        Box::new(HISTORY_WRITE_FAILURES.clone()),
        // External services
        Box::new(EXTERNAL_SERVICE_DURATION.clone()),
        Box::new(EXTERNAL_SERVICE_REQUESTS.clone()),
    ]
}
