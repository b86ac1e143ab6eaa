use axum::{http::Method, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::{handlers, middleware::metrics_middleware, readers, search};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD]);

    Router::new()
        // Search
        .route("/list", get(search::list))
        // Readers
        .route("/detail", get(readers::detail))
        .route("/recommend", get(readers::recommend))
        .route("/trend", get(readers::trend))
        .route("/state", get(readers::index_state))
        // Operations
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
