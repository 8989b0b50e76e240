//! Domain layer: chat message model and connection bookkeeping.
//!
//! The relay has a single entity, [`ChatMessage`], identified by a
//! [`MessageId`]. [`ConnectionStats`] is the only state shared between
//! WebSocket connections.

pub mod chat_message;
pub mod connection_stats;
pub mod message_id;

pub use chat_message::{ChatMessage, Sender};
pub use connection_stats::{ConnectionGuard, ConnectionStats};
pub use message_id::MessageId;
