//! API layer - HTTP and WebSocket entry points.

pub mod connections;
pub mod http;
pub mod websocket;

pub use connections::ConnectionManager;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::app::App;

/// Path of the realtime presence hub.
pub const HUB_PATH: &str = "/online";

/// HTTP routes plus the presence hub, with request tracing.
pub fn router(app: Arc<App>) -> Router {
    http::routes()
        .route(HUB_PATH, get(websocket::ws_handler))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}
