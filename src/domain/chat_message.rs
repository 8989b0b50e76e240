//! Chat message entity.
//!
//! A [`ChatMessage`] is the only entity the relay knows about: an
//! identifier, the text content, who sent it, and when. Timestamps are
//! Unix epoch milliseconds, the unit the browser client produces.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MessageId;

/// Originator of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Typed by the person using the client.
    User,
    /// Written back by the relay.
    Server,
}

impl Sender {
    /// Returns the wire name of the sender.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Server => "server",
        }
    }

    /// Parses a wire name; unknown tags yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "server" => Some(Self::Server),
            _ => None,
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    /// Message identifier.
    pub id: MessageId,
    /// Text content.
    pub content: String,
    /// Who sent the message.
    pub sender: Sender,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

impl ChatMessage {
    /// Builds a user message, minting an id and timestamp when the client
    /// did not provide them.
    #[must_use]
    pub fn from_user(id: Option<MessageId>, content: String, timestamp: Option<i64>) -> Self {
        Self {
            id: id.unwrap_or_else(MessageId::generate),
            content,
            sender: Sender::User,
            timestamp: timestamp.unwrap_or_else(now_millis),
        }
    }
}

/// Current time as Unix epoch milliseconds.
fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
