//! Opponent-process dials used to re-score relevance.
//!
//! Each axis is a dial in `[0, 1]` blending two competing pressures:
//!
//! - `exploration`: novel (low-activation) vs familiar (high-activation) items
//! - `breadth`: weakly connected vs strongly connected items
//! - `stability`: peripheral vs focal items
//! - `speed`: cached activation vs freshly computed base score

use serde::{Deserialize, Serialize};

use super::personality::PersonalityTraits;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpponentAxes {
    pub exploration: f64,
    pub breadth: f64,
    pub stability: f64,
    pub speed: f64,
}

impl Default for OpponentAxes {
    fn default() -> Self {
        Self::balanced()
    }
}

impl OpponentAxes {
    pub fn balanced() -> Self {
        Self {
            exploration: 0.5,
            breadth: 0.5,
            stability: 0.5,
            speed: 0.5,
        }
    }

    /// Derives the dials from personality.
    ///
    /// Higher `chaotic` raises exploration and lowers stability; higher
    /// `intelligence` lowers breadth and speed (depth and accuracy).
    pub fn from_traits(traits: &PersonalityTraits) -> Self {
        let chaotic = traits.chaotic();
        let intelligence = traits.intelligence();
        Self {
            exploration: 0.1 + 0.8 * chaotic,
            breadth: 0.9 - 0.8 * intelligence,
            stability: 0.9 - 0.8 * chaotic,
            speed: 0.9 - 0.8 * intelligence,
        }
    }

    /// Returns a copy with every dial clamped to `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            exploration: self.exploration.clamp(0.0, 1.0),
            breadth: self.breadth.clamp(0.0, 1.0),
            stability: self.stability.clamp(0.0, 1.0),
            speed: self.speed.clamp(0.0, 1.0),
        }
    }
}
