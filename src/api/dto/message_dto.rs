//! Message history DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::persistence::StoredMessage;

/// Largest page the history endpoint returns.
pub const MAX_HISTORY_LIMIT: u32 = 200;

/// Query parameters for `GET /api/v1/messages`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Number of messages to return (1–200). Defaults to 50.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

impl Default for HistoryParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

impl HistoryParams {
    /// Clamps `limit` to `1..=MAX_HISTORY_LIMIT`.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            limit: self.limit.clamp(1, MAX_HISTORY_LIMIT),
        }
    }
}

/// One transcript entry.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredMessageDto {
    /// Client-assigned message identifier.
    pub id: String,
    /// Text content.
    pub content: String,
    /// Sender tag.
    pub sender: String,
    /// Client-side timestamp in Unix epoch milliseconds.
    pub timestamp: i64,
    /// When the relay received the message.
    pub received_at: DateTime<Utc>,
}

impl From<StoredMessage> for StoredMessageDto {
    fn from(row: StoredMessage) -> Self {
        Self {
            id: row.message_id,
            content: row.content,
            sender: row.sender,
            timestamp: row.sent_at_ms,
            received_at: row.received_at,
        }
    }
}

/// Response body for `GET /api/v1/messages`.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageListResponse {
    /// Messages, newest first.
    pub data: Vec<StoredMessageDto>,
    /// Number of messages in `data`.
    pub count: usize,
    /// Limit applied after clamping.
    pub limit: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(HistoryParams { limit: 0 }.clamped().limit, 1);
        assert_eq!(HistoryParams { limit: 10_000 }.clamped().limit, MAX_HISTORY_LIMIT);
        assert_eq!(HistoryParams { limit: 25 }.clamped().limit, 25);
    }

    #[test]
    fn default_limit_is_fifty() {
        assert_eq!(HistoryParams::default().limit, 50);
    }

    #[test]
    fn dto_uses_client_fields() {
        let row = StoredMessage {
            id: 9,
            message_id: "1700".to_string(),
            content: "hi".to_string(),
            sender: "user".to_string(),
            sent_at_ms: 1700,
            received_at: Utc::now(),
        };
        let dto = StoredMessageDto::from(row);
        assert_eq!(dto.id, "1700");
        assert_eq!(dto.timestamp, 1700);
    }
}
