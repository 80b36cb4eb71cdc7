//! Cognition: memory, salience, framing and selection.
//!
//! Everything here is synchronous and I/O free. Time is passed in as `now`
//! and entropy through [`crate::random::RandomSource`].

pub mod framing;
pub mod memory;
pub mod parameters;
pub mod relevance;
pub mod selection;

pub use framing::{FramedSituation, FramingSystem};
pub use memory::{EpisodicMemory, MemoryConfig, RecalledEpisode};
pub use parameters::{generate_parameters, generate_value, STRING_PLACEHOLDER};
pub use relevance::{AxisContributions, LandscapeConfig, RelevanceScore, SalienceLandscape};
pub use selection::{
    ActionSelector, ScoredCandidate, Selection, SelectionConfig, SelectionInput, SelectionReason,
    DEFAULT_IDENTITY_ACTION,
};
