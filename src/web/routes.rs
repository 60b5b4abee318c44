//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Conversation
        .route("/chat", post(handlers::chat))
        .route("/history", get(handlers::history))
        .route("/clear", post(handlers::clear))
        // Diagnostics
        .route("/stats", get(handlers::stats))
        .route("/search", get(handlers::search))
        .layer(cors)
        .with_state(state)
}
