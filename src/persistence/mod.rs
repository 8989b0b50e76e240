//! Persistence layer: optional PostgreSQL chat transcript.
//!
//! When `PERSISTENCE_ENABLED` is set, every relayed user message is
//! appended to the `chat_messages` table. Otherwise the relay keeps no
//! server-side state.

pub mod models;
pub mod postgres;

pub use models::StoredMessage;
pub use postgres::PostgresPersistence;
