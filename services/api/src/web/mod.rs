pub mod rest;
pub mod state;

pub use rest::{
    health_handler, log_mood_handler, mood_history_handler, mood_stats_handler,
    save_journal_entry_handler,
};

use crate::error::ApiError;
use axum::{
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Builds the REST router with CORS and request tracing applied.
pub fn api_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    Ok(Router::new()
        .route("/moods", post(log_mood_handler))
        .route("/users/{user_id}/mood-stats", get(mood_stats_handler))
        .route("/users/{user_id}/mood-history", get(mood_history_handler))
        .route("/journal-entries", post(save_journal_entry_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state))
}
