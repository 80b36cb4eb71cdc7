//! Emotional state of the agent
//!
//! - Emotion: the primary feeling, used for frame matching and action coupling
//! - EmotionalState: primary emotion plus intensity, mutated after each result
//! - EmotionalSnapshot: immutable copy stored alongside episodes

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::contains_term;

/// Intensity under which the state collapses back to `Neutral`.
const NEUTRAL_FLOOR: f64 = 0.05;

/// Primary emotion of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    #[default]
    Neutral,
    Joy,
    Curiosity,
    Excitement,
    Frustration,
    Fear,
    Boredom,
}

impl Emotion {
    pub fn all() -> &'static [Emotion] {
        &[
            Emotion::Neutral,
            Emotion::Joy,
            Emotion::Curiosity,
            Emotion::Excitement,
            Emotion::Frustration,
            Emotion::Fear,
            Emotion::Boredom,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Emotion::Neutral => "Neutral",
            Emotion::Joy => "Joy",
            Emotion::Curiosity => "Curiosity",
            Emotion::Excitement => "Excitement",
            Emotion::Frustration => "Frustration",
            Emotion::Fear => "Fear",
            Emotion::Boredom => "Boredom",
        }
    }

    /// Pleasantness of the emotion in `[-1, 1]`.
    pub fn valence(&self) -> f64 {
        match self {
            Emotion::Joy => 0.8,
            Emotion::Excitement => 0.6,
            Emotion::Curiosity => 0.4,
            Emotion::Neutral => 0.0,
            Emotion::Boredom => -0.3,
            Emotion::Frustration => -0.6,
            Emotion::Fear => -0.8,
        }
    }

    /// Verb couplings: actions whose name or description mention the verb get
    /// the listed bonus (negative values are penalties).
    pub fn action_coupling(&self) -> &'static [(&'static str, f64)] {
        match self {
            Emotion::Neutral => &[],
            Emotion::Joy => &[("play", 0.15), ("talk", 0.1), ("celebrate", 0.2), ("attack", -0.05)],
            Emotion::Curiosity => &[("explore", 0.2), ("inspect", 0.2), ("look", 0.15), ("open", 0.1)],
            Emotion::Excitement => &[("attack", 0.15), ("play", 0.1), ("jump", 0.15), ("wait", -0.1)],
            Emotion::Frustration => &[("attack", 0.2), ("throw", 0.15), ("wait", -0.15), ("skip", 0.1)],
            Emotion::Fear => &[("defend", 0.2), ("flee", 0.2), ("hide", 0.15), ("attack", -0.15)],
            Emotion::Boredom => &[("random", 0.15), ("explore", 0.1), ("wait", -0.2)],
        }
    }

    /// Sum of coupling bonuses matched by `text`.
    pub fn coupling_bonus(&self, text: &str) -> f64 {
        self.action_coupling()
            .iter()
            .filter(|(verb, _)| contains_term(text, verb))
            .map(|(_, bonus)| bonus)
            .sum()
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "neutral" => Ok(Emotion::Neutral),
            "joy" => Ok(Emotion::Joy),
            "curiosity" => Ok(Emotion::Curiosity),
            "excitement" => Ok(Emotion::Excitement),
            "frustration" => Ok(Emotion::Frustration),
            "fear" => Ok(Emotion::Fear),
            "boredom" => Ok(Emotion::Boredom),
            _ => Err(format!("Unknown emotion: {}", s)),
        }
    }
}

/// Frozen copy of the emotional state at the time an episode was stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EmotionalSnapshot {
    pub primary: Emotion,
    pub intensity: f64,
    pub valence: f64,
}

/// Mutable emotional state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct EmotionalState {
    primary: Emotion,
    intensity: f64,
}

impl EmotionalState {
    pub fn new(primary: Emotion, intensity: f64) -> Self {
        let intensity = intensity.clamp(0.0, 1.0);
        if primary == Emotion::Neutral {
            return Self::default();
        }
        Self { primary, intensity }
    }

    pub fn primary(&self) -> Emotion {
        self.primary
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Pushes the state toward `emotion` by `delta`.
    ///
    /// The same emotion accumulates (capped at 1). A different emotion takes
    /// over only when `delta` reaches the current intensity; otherwise it
    /// dampens the current feeling.
    pub fn feel(&mut self, emotion: Emotion, delta: f64) {
        let delta = delta.clamp(0.0, 1.0);
        if emotion == self.primary {
            self.intensity = (self.intensity + delta).min(1.0);
        } else if delta >= self.intensity {
            self.primary = emotion;
            self.intensity = delta;
        } else {
            self.intensity = (self.intensity - delta).max(0.0);
        }
        self.settle();
    }

    /// Multiplies intensity by `factor`, collapsing to `Neutral` near zero.
    pub fn decay(&mut self, factor: f64) {
        self.intensity *= factor.clamp(0.0, 1.0);
        self.settle();
    }

    /// Coupling bonus for an action, scaled by how strongly the emotion is felt.
    pub fn action_bonus(&self, action_text: &str) -> f64 {
        self.primary.coupling_bonus(action_text) * (0.5 + 0.5 * self.intensity)
    }

    pub fn snapshot(&self) -> EmotionalSnapshot {
        EmotionalSnapshot {
            primary: self.primary,
            intensity: self.intensity,
            valence: self.primary.valence() * self.intensity,
        }
    }

    fn settle(&mut self) {
        if self.primary == Emotion::Neutral || self.intensity < NEUTRAL_FLOOR {
            self.primary = Emotion::Neutral;
            self.intensity = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_emotion_accumulates_and_caps() {
        let mut state = EmotionalState::new(Emotion::Joy, 0.9);
        state.feel(Emotion::Joy, 0.3);
        assert_eq!(state.primary(), Emotion::Joy);
        assert_eq!(state.intensity(), 1.0);
    }

    #[test]
    fn test_stronger_emotion_takes_over() {
        let mut state = EmotionalState::new(Emotion::Joy, 0.2);
        state.feel(Emotion::Frustration, 0.3);
        assert_eq!(state.primary(), Emotion::Frustration);
        assert!((state.intensity() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_weaker_emotion_dampens() {
        let mut state = EmotionalState::new(Emotion::Fear, 0.8);
        state.feel(Emotion::Joy, 0.2);
        assert_eq!(state.primary(), Emotion::Fear);
        assert!((state.intensity() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_decay_collapses_to_neutral() {
        let mut state = EmotionalState::new(Emotion::Curiosity, 0.1);
        state.decay(0.3);
        assert_eq!(state.primary(), Emotion::Neutral);
        assert_eq!(state.intensity(), 0.0);
    }

    #[test]
    fn test_fear_couples_with_defense() {
        let state = EmotionalState::new(Emotion::Fear, 1.0);
        assert!(state.action_bonus("defend") > 0.0);
        assert!(state.action_bonus("attack") < 0.0);
        assert_eq!(state.action_bonus("shuffle"), 0.0);
    }

    #[test]
    fn test_emotion_from_str() {
        assert_eq!("JOY".parse::<Emotion>(), Ok(Emotion::Joy));
        assert!("ennui".parse::<Emotion>().is_err());
    }
}
