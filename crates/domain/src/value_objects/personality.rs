//! Personality traits that bias framing, relevance and selection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single named personality dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalityTrait {
    /// Appetite for disorder and random choices
    Chaotic,
    /// Preference for deliberate, accurate play
    Intelligence,
    /// Treats the game as fun rather than work
    Playfulness,
    /// Drawn to the unknown
    Curiosity,
    /// Drawn to other participants
    Sociability,
    /// Risk aversion
    Caution,
}

impl PersonalityTrait {
    pub fn all() -> &'static [PersonalityTrait] {
        &[
            PersonalityTrait::Chaotic,
            PersonalityTrait::Intelligence,
            PersonalityTrait::Playfulness,
            PersonalityTrait::Curiosity,
            PersonalityTrait::Sociability,
            PersonalityTrait::Caution,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PersonalityTrait::Chaotic => "chaotic",
            PersonalityTrait::Intelligence => "intelligence",
            PersonalityTrait::Playfulness => "playfulness",
            PersonalityTrait::Curiosity => "curiosity",
            PersonalityTrait::Sociability => "sociability",
            PersonalityTrait::Caution => "caution",
        }
    }
}

impl fmt::Display for PersonalityTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Trait levels, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalityTraits {
    chaotic: f64,
    intelligence: f64,
    playfulness: f64,
    curiosity: f64,
    sociability: f64,
    caution: f64,
}

impl Default for PersonalityTraits {
    fn default() -> Self {
        Self {
            chaotic: 0.5,
            intelligence: 0.5,
            playfulness: 0.5,
            curiosity: 0.5,
            sociability: 0.5,
            caution: 0.5,
        }
    }
}

impl PersonalityTraits {
    /// Builder-style setter; the value is clamped to `[0, 1]`.
    pub fn with(mut self, personality_trait: PersonalityTrait, value: f64) -> Self {
        self.set(personality_trait, value);
        self
    }

    pub fn set(&mut self, personality_trait: PersonalityTrait, value: f64) {
        let value = if value.is_finite() {
            value.clamp(0.0, 1.0)
        } else {
            0.5
        };
        match personality_trait {
            PersonalityTrait::Chaotic => self.chaotic = value,
            PersonalityTrait::Intelligence => self.intelligence = value,
            PersonalityTrait::Playfulness => self.playfulness = value,
            PersonalityTrait::Curiosity => self.curiosity = value,
            PersonalityTrait::Sociability => self.sociability = value,
            PersonalityTrait::Caution => self.caution = value,
        }
    }

    pub fn get(&self, personality_trait: PersonalityTrait) -> f64 {
        match personality_trait {
            PersonalityTrait::Chaotic => self.chaotic,
            PersonalityTrait::Intelligence => self.intelligence,
            PersonalityTrait::Playfulness => self.playfulness,
            PersonalityTrait::Curiosity => self.curiosity,
            PersonalityTrait::Sociability => self.sociability,
            PersonalityTrait::Caution => self.caution,
        }
    }

    pub fn chaotic(&self) -> f64 {
        self.chaotic
    }

    pub fn intelligence(&self) -> f64 {
        self.intelligence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_neutral() {
        let traits = PersonalityTraits::default();
        for t in PersonalityTrait::all() {
            assert_eq!(traits.get(*t), 0.5);
        }
    }

    #[test]
    fn test_values_are_clamped() {
        let traits = PersonalityTraits::default()
            .with(PersonalityTrait::Chaotic, 3.0)
            .with(PersonalityTrait::Caution, -1.0)
            .with(PersonalityTrait::Curiosity, f64::NAN);
        assert_eq!(traits.chaotic(), 1.0);
        assert_eq!(traits.get(PersonalityTrait::Caution), 0.0);
        assert_eq!(traits.get(PersonalityTrait::Curiosity), 0.5);
    }
}
