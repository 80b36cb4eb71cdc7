//! gamemind Protocol - shared types for the game <-> agent channel
//!
//! This crate contains the wire-format messages exchanged over the WebSocket:
//! - `IncomingMessage` (game → agent)
//! - `OutgoingMessage` (agent → game)
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json, and thiserror
//! 2. **No business logic** - Pure data types and serialization

pub mod error;
pub mod messages;

pub use error::ProtocolError;
pub use messages::{
    ActionData, ActionDefinition, ActionResultData, ContextData, ForceActionData,
    IncomingMessage, OutgoingMessage, RegisterActionsData, UnregisterActionsData,
};
