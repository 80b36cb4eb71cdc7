//! Value objects - immutable, self-validating types without identity.

mod action_schema;
mod emotion;
mod opponent_axes;
mod personality;

pub use action_schema::{NumberBound, SchemaNode, DEFAULT_NUMBER_MAX, DEFAULT_NUMBER_MIN};
pub use emotion::{Emotion, EmotionalSnapshot, EmotionalState};
pub use opponent_axes::OpponentAxes;
pub use personality::{PersonalityTrait, PersonalityTraits};
