//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /` and `GET /ws` — Upgrade HTTP connection to WebSocket.
///
/// The socket is not authenticated; any client may connect.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let service = std::sync::Arc::clone(&state.relay_service);

    ws.max_message_size(state.max_message_bytes)
        .on_upgrade(move |socket| run_connection(socket, service))
}
