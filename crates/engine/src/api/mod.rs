//! API layer - HTTP and WebSocket entry points.

pub mod connections;
pub mod http;
pub mod websocket;

#[cfg(test)]
mod ws_integration_tests;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::app::App;

pub use connections::ConnectionManager;

/// Full router: HTTP routes plus the WebSocket endpoint at `/` and `/ws`.
pub fn router(app: Arc<App>) -> Router {
    http::routes()
        .route("/", get(websocket::ws_handler))
        .route("/ws", get(websocket::ws_handler))
        .with_state(app)
}
