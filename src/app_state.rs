//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Relay service for all frame handling and transcript access.
    pub relay_service: Arc<RelayService>,
    /// Largest inbound WebSocket message accepted, in bytes.
    pub max_message_bytes: usize,
}

impl AppState {
    /// Builds state around `relay_service`.
    #[must_use]
    pub fn new(relay_service: RelayService, max_message_bytes: usize) -> Self {
        Self {
            relay_service: Arc::new(relay_service),
            max_message_bytes,
        }
    }
}
