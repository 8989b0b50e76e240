//! # chat-relay
//!
//! WebSocket chat relay. Clients send JSON chat envelopes over a WebSocket
//! and get the envelope's `content` written back on the same connection.
//! Malformed frames get `{"error":"Invalid message format"}`.
//!
//! There is no fan-out and no authentication on the socket. An optional
//! PostgreSQL transcript records relayed user messages.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket, HTTP)
//!     │
//!     ├── WS Handler (ws/)        REST Handlers (api/)
//!     │
//!     ├── RelayService (service/)
//!     ├── ConnectionStats (domain/)
//!     │
//!     └── PostgreSQL transcript (persistence/, optional)
//! ```

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;

use app_state::AppState;
use ws::handler::ws_handler;

/// Builds the full application router: WebSocket relay at `/` and `/ws`,
/// REST endpoints with a request timeout, tracing and permissive CORS.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    let rest = api::build_router().layer(TimeoutLayer::new(request_timeout));

    Router::new()
        .route("/", get(ws_handler))
        .route("/ws", get(ws_handler))
        .merge(rest)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
