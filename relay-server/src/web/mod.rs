//! Web server module for handling push deliveries.
//!
//! This module provides a thin web server that:
//! - Receives push-delivered envelopes on `/`
//! - Decodes and routes the embedded payload
//! - Forwards one log record per delivery to the logging backend

pub mod handlers;

use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;

pub use handlers::{health, pubsub_push, AppState, HealthResponse};

/// Build the application router.
///
/// The push route is method-agnostic, matching how the upstream delivery
/// system registers its endpoint.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(pubsub_push))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
