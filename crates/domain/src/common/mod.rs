//! Common utility functions shared across the cognition modules.
//!
//! # Design Principles
//!
//! - **Pure functions only** - no side effects, no I/O
//! - **Minimal dependencies** - standard library only

pub mod string;

// Re-export commonly used functions at crate root for convenience
pub use string::{contains_term, term_overlap, tokenize};
