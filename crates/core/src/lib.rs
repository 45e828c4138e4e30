//! Shared domain types for the copresence coordination service.
//!
//! This crate has no internal dependencies so the persistence layer, the
//! event bus, the API surface, and any future worker tooling can all
//! reference the same identifiers, error taxonomy, coordination constants,
//! and WebSocket message protocol.

pub mod coordination;
pub mod error;
pub mod protocol;
pub mod types;
