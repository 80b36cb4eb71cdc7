//! In-memory stores for per-connection session state.

mod action_registry;

pub use action_registry::{ActionRegistry, RegistrationReport};
