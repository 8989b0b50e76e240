//! Per-connection relay loop.
//!
//! Reads frames from a single WebSocket and writes exactly one text reply
//! per data frame, in arrival order, back to the same socket.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tracing::Instrument;

use crate::service::RelayService;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Text and binary frames are handed to [`RelayService`] and the reply
///   is sent back as a text frame.
/// - Ping/pong are answered by the socket layer.
/// - A close frame, end of stream, read error, or failed write ends the
///   loop.
pub async fn run_connection(socket: WebSocket, service: Arc<RelayService>) {
    let conn_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("ws", %conn_id);

    async move {
        let _guard = service.stats().open();
        tracing::info!(active = service.stats().active(), "client connected");

        let (mut ws_tx, mut ws_rx) = socket.split();
        let mut relayed: u64 = 0;

        while let Some(msg) = ws_rx.next().await {
            let reply = match msg {
                Ok(Message::Text(text)) => service.relay_text(text.as_str()).await,
                Ok(Message::Binary(bytes)) => service.relay_binary(&bytes).await,
                Ok(Message::Close(_)) => break,
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "ws read failed");
                    break;
                }
            };

            if ws_tx.send(Message::text(reply)).await.is_err() {
                tracing::debug!("ws write failed");
                break;
            }
            relayed += 1;
        }

        tracing::info!(relayed, "client disconnected");
    }
    .instrument(span)
    .await;
}
