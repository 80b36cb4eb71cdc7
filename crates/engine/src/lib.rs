//! gamemind Engine library.
//!
//! Long-running service that plays turn-based games over a WebSocket.
//!
//! ## Structure
//!
//! - `use_cases/` - Negotiation state machine and the deciding agent
//! - `stores/` - Per-session in-memory state
//! - `infrastructure/` - Clock, entropy and configuration
//! - `api/` - HTTP and WebSocket entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

pub use app::App;
