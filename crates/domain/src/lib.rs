//! Core types and cognition for the gamemind agent.
//!
//! This crate has no I/O and no async runtime. The engine crate owns the
//! session, the clock and the transport; it calls in here to remember, rank,
//! frame and decide.

pub mod cognition;
pub mod common;
pub mod entities;
pub mod error;
pub mod ids;
pub mod random;
pub mod value_objects;

pub use cognition::{
    generate_parameters, ActionSelector, EpisodicMemory, FramedSituation, FramingSystem,
    LandscapeConfig, MemoryConfig, RecalledEpisode, RelevanceScore, SalienceLandscape, Selection,
    SelectionConfig, SelectionInput, SelectionReason, DEFAULT_IDENTITY_ACTION,
};
pub use entities::{episode_tags, Episode, Frame, FrameKind, RegisteredAction, SalienceNode};
pub use error::DomainError;
pub use ids::{ActionId, EpisodeId, NodeId};
pub use random::{RandomSource, ScriptedRandom};
pub use value_objects::{
    Emotion, EmotionalSnapshot, EmotionalState, NumberBound, OpponentAxes, PersonalityTrait,
    PersonalityTraits, SchemaNode,
};
