// crates/server/src/routes/mod.rs
//! API route handlers for the mentor-chat server.

pub mod chat;
pub mod health;
pub mod models;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the combined API router with all routes under /api prefix.
///
/// Routes:
/// - GET  /api/health - Health check
/// - GET  /api/models - List selectable models
/// - POST /api/chat   - Relay one message to the selected model
pub fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", health::router())
        .nest("/api", models::router())
        .nest("/api", chat::router())
        .with_state(state)
}
