//! Database models for the chat transcript.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored row from the `chat_messages` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    /// Auto-increment row ID.
    pub id: i64,
    /// Client-assigned message identifier.
    pub message_id: String,
    /// Text content as relayed.
    pub content: String,
    /// Sender tag (`"user"` or `"server"`).
    pub sender: String,
    /// Client-side timestamp in Unix epoch milliseconds.
    pub sent_at_ms: i64,
    /// Server-side insertion timestamp.
    pub received_at: DateTime<Utc>,
}
