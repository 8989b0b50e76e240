//! WebSocket layer: upgrade handling, the relay loop, and wire types.
//!
//! The WebSocket endpoint is mounted at `/` (where browser clients
//! connect) and at `/ws`. Each frame gets exactly one reply on the same
//! connection; nothing is fanned out to other clients.

pub mod connection;
pub mod handler;
pub mod messages;
