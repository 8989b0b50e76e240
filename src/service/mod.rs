//! Service layer: relay orchestration.
//!
//! The service layer sits between the WebSocket/REST handlers and the
//! optional transcript store.

pub mod relay_service;

pub use relay_service::RelayService;
