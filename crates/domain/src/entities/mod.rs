//! Domain entities - objects with identity.

mod episode;
mod frame;
mod registered_action;
mod salience_node;

pub use episode::{tags as episode_tags, Episode, EpisodeBuilder};
pub use frame::{Frame, FrameKind, FRAME_ACTIVATION_FLOOR};
pub use registered_action::RegisteredAction;
pub use salience_node::SalienceNode;
