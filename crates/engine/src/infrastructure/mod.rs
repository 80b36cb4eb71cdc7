//! Infrastructure implementations.
//!
//! Contains port trait implementations and environment configuration.

pub mod clock;
pub mod ports;
pub mod settings;
