//! Frame - an interpretive lens over the situation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{Emotion, PersonalityTrait};

/// Minimum activation a frame decays to.
pub const FRAME_ACTIVATION_FLOOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Play,
    Chaos,
    Strategy,
    Survival,
    Social,
    Exploration,
}

impl FrameKind {
    pub fn all() -> &'static [FrameKind] {
        &[
            FrameKind::Play,
            FrameKind::Chaos,
            FrameKind::Strategy,
            FrameKind::Survival,
            FrameKind::Social,
            FrameKind::Exploration,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FrameKind::Play => "play",
            FrameKind::Chaos => "chaos",
            FrameKind::Strategy => "strategy",
            FrameKind::Survival => "survival",
            FrameKind::Social => "social",
            FrameKind::Exploration => "exploration",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    kind: FrameKind,
    salient_terms: &'static [&'static str],
    backgrounded_terms: &'static [&'static str],
    affordance_verbs: &'static [&'static str],
    emotion: Emotion,
    biasing_trait: PersonalityTrait,
    activation: f64,
}

impl Frame {
    /// The fixed frame repertoire, all starting at activation 0.5.
    pub fn repertoire() -> Vec<Frame> {
        FrameKind::all().iter().map(|kind| Frame::new(*kind)).collect()
    }

    pub fn new(kind: FrameKind) -> Self {
        let (salient_terms, backgrounded_terms, affordance_verbs, emotion, biasing_trait): (
            &'static [&'static str],
            &'static [&'static str],
            &'static [&'static str],
            Emotion,
            PersonalityTrait,
        ) = match kind {
            FrameKind::Play => (
                &["fun", "game", "play", "win", "round", "score", "funny"],
                &["danger", "risk", "threat"],
                &["play", "talk", "joke", "dance", "celebrate"],
                Emotion::Joy,
                PersonalityTrait::Playfulness,
            ),
            FrameKind::Chaos => (
                &["chaos", "random", "break", "wild", "explode", "mess"],
                &["plan", "rule", "order"],
                &["attack", "throw", "break", "random", "destroy"],
                Emotion::Excitement,
                PersonalityTrait::Chaotic,
            ),
            FrameKind::Strategy => (
                &["turn", "card", "plan", "move", "board", "points", "opponent"],
                &["fun", "joke"],
                &["choose", "play", "move", "place", "plan"],
                Emotion::Curiosity,
                PersonalityTrait::Intelligence,
            ),
            FrameKind::Survival => (
                &["danger", "health", "enemy", "attack", "hurt", "die", "threat"],
                &["fun", "chat"],
                &["defend", "heal", "flee", "hide", "block"],
                Emotion::Fear,
                PersonalityTrait::Caution,
            ),
            FrameKind::Social => (
                &["friend", "chat", "name", "player", "team", "hello"],
                &["enemy", "points"],
                &["talk", "say", "greet", "name", "help"],
                Emotion::Joy,
                PersonalityTrait::Sociability,
            ),
            FrameKind::Exploration => (
                &["new", "unknown", "map", "door", "room", "hidden", "explore"],
                &["score", "turn"],
                &["explore", "look", "inspect", "open", "walk"],
                Emotion::Curiosity,
                PersonalityTrait::Curiosity,
            ),
        };
        Self {
            kind,
            salient_terms,
            backgrounded_terms,
            affordance_verbs,
            emotion,
            biasing_trait,
            activation: 0.5,
        }
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn salient_terms(&self) -> &'static [&'static str] {
        self.salient_terms
    }

    pub fn backgrounded_terms(&self) -> &'static [&'static str] {
        self.backgrounded_terms
    }

    pub fn affordance_verbs(&self) -> &'static [&'static str] {
        self.affordance_verbs
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn biasing_trait(&self) -> PersonalityTrait {
        self.biasing_trait
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    /// Winner boost: +`amount`, capped at 1.
    pub fn boost(&mut self, amount: f64) {
        self.activation = (self.activation + amount).min(1.0);
    }

    /// Loser decay: -`amount`, floored at [`FRAME_ACTIVATION_FLOOR`].
    pub fn suppress(&mut self, amount: f64) {
        self.activation = (self.activation - amount).max(FRAME_ACTIVATION_FLOOR);
    }
}
