//! Relay service: turns inbound frames into replies.

use crate::domain::{ChatMessage, ConnectionStats};
use crate::error::RelayError;
use crate::persistence::{PostgresPersistence, StoredMessage};
use crate::ws::messages::{ErrorEnvelope, FrameError, parse_binary_frame, parse_frame};

/// Orchestration layer for the relay.
///
/// Every relay step follows the pattern: parse frame → log → record in
/// the transcript (if enabled) → return the reply text. Transcript
/// failures are logged and never alter the reply.
#[derive(Debug, Clone)]
pub struct RelayService {
    store: Option<PostgresPersistence>,
    stats: ConnectionStats,
}

impl RelayService {
    /// Creates a new `RelayService`. Pass `None` for a stateless relay.
    #[must_use]
    pub fn new(store: Option<PostgresPersistence>) -> Self {
        Self {
            store,
            stats: ConnectionStats::new(),
        }
    }

    /// Returns the shared connection counters.
    #[must_use]
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Returns `true` when a transcript store is configured.
    #[must_use]
    pub fn persistence_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Produces the reply for a text frame.
    ///
    /// The reply is the message `content` for a valid envelope and the
    /// `{"error":"Invalid message format"}` envelope otherwise.
    pub async fn relay_text(&self, text: &str) -> String {
        self.reply(parse_frame(text)).await
    }

    /// Produces the reply for a binary frame, decoded as UTF-8.
    pub async fn relay_binary(&self, bytes: &[u8]) -> String {
        self.reply(parse_binary_frame(bytes)).await
    }

    async fn reply(&self, parsed: Result<ChatMessage, FrameError>) -> String {
        match parsed {
            Ok(message) => {
                tracing::debug!(
                    message_id = %message.id,
                    timestamp = message.timestamp,
                    len = message.content.len(),
                    "message received"
                );
                self.record(&message).await;
                message.content
            }
            Err(err) => {
                tracing::warn!(error = %err, "rejected frame");
                ErrorEnvelope::invalid_format().to_json()
            }
        }
    }

    async fn record(&self, message: &ChatMessage) {
        let Some(store) = &self.store else {
            return;
        };
        if let Err(err) = store.save_message(message).await {
            tracing::error!(message_id = %message.id, error = %err, "failed to record message");
        }
    }

    /// Returns the most recent transcript entries, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::PersistenceDisabled`] when no store is
    /// configured, or a [`RelayError::PersistenceError`] on database
    /// failure.
    pub async fn history(&self, limit: u32) -> Result<Vec<StoredMessage>, RelayError> {
        let store = self.store.as_ref().ok_or(RelayError::PersistenceDisabled)?;
        store.recent_messages(limit).await
    }

    /// Deletes transcript entries older than `days`. Returns the number of
    /// rows removed; zero when persistence is disabled.
    ///
    /// # Errors
    ///
    /// Returns a [`RelayError::PersistenceError`] on database failure.
    pub async fn purge_older_than(&self, days: u64) -> Result<u64, RelayError> {
        match &self.store {
            Some(store) => store.delete_older_than(days).await,
            None => Ok(0),
        }
    }
}
