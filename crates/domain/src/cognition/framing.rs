//! Framing - choosing an interpretive lens for the situation.
//!
//! Every frame is scored on hysteresis (its current activation), salient-term
//! hits, a personality bonus, emotional match and affordances among the
//! registered actions. The winner is boosted and the rest decay, so a switch
//! needs a clear margin and ties keep the current frame.

use crate::common::tokenize;
use crate::entities::{Frame, FrameKind, RegisteredAction};
use crate::value_objects::{Emotion, EmotionalState, PersonalityTraits};

const SALIENT_HIT_WEIGHT: f64 = 0.3;
const TRAIT_WEIGHT: f64 = 0.4;
const EMOTION_MATCH_BONUS: f64 = 0.3;
const AFFORDANCE_HIT_WEIGHT: f64 = 0.2;
const WINNER_BOOST: f64 = 0.2;
const LOSER_DECAY: f64 = 0.1;

/// Result of applying the active frame to a situation.
#[derive(Debug, Clone, PartialEq)]
pub struct FramedSituation {
    pub frame: FrameKind,
    /// Registered actions whose name/description contains an affordance verb.
    /// Empty means the caller must fall back to the full candidate set.
    pub viable_actions: Vec<String>,
    /// Salient terms actually present in the situation text
    pub salient_found: Vec<String>,
    /// Backgrounded terms present in the situation text
    pub backgrounded_found: Vec<String>,
}

impl FramedSituation {
    pub fn is_viable(&self, action_name: &str) -> bool {
        self.viable_actions.iter().any(|name| name == action_name)
    }
}

#[derive(Debug, Clone)]
pub struct FramingSystem {
    frames: Vec<Frame>,
    active: usize,
}

impl Default for FramingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FramingSystem {
    /// Starts with the full repertoire; `strategy` is the initial lens.
    pub fn new() -> Self {
        let frames = Frame::repertoire();
        let active = frames
            .iter()
            .position(|f| f.kind() == FrameKind::Strategy)
            .unwrap_or(0);
        Self { frames, active }
    }

    pub fn active(&self) -> &Frame {
        &self.frames[self.active]
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Scores every frame without mutating anything.
    pub fn frame_scores(
        &self,
        situation: &str,
        personality: &PersonalityTraits,
        emotion: &EmotionalState,
        registered: &[RegisteredAction],
    ) -> Vec<(FrameKind, f64)> {
        let situation_terms = tokenize(situation);
        self.frames
            .iter()
            .map(|frame| {
                let salient_hits = frame
                    .salient_terms()
                    .iter()
                    .filter(|term| situation_terms.contains(**term))
                    .count() as f64;
                let trait_bonus = TRAIT_WEIGHT * personality.get(frame.biasing_trait());
                let emotion_bonus = if emotion.primary() != Emotion::Neutral
                    && emotion.primary() == frame.emotion()
                {
                    EMOTION_MATCH_BONUS
                } else {
                    0.0
                };
                let affordance_hits = registered
                    .iter()
                    .filter(|action| frame.affordance_verbs().iter().any(|verb| action.mentions(verb)))
                    .count() as f64;

                let score = frame.activation()
                    + SALIENT_HIT_WEIGHT * salient_hits
                    + trait_bonus
                    + emotion_bonus
                    + AFFORDANCE_HIT_WEIGHT * affordance_hits;
                (frame.kind(), score)
            })
            .collect()
    }

    /// Picks the highest-scoring frame and applies winner-take-more dynamics.
    pub fn select_frame(
        &mut self,
        situation: &str,
        personality: &PersonalityTraits,
        emotion: &EmotionalState,
        registered: &[RegisteredAction],
    ) -> &Frame {
        let scores = self.frame_scores(situation, personality, emotion, registered);

        // Start from the incumbent so that ties never switch frames.
        let mut winner = self.active;
        let mut best = scores[self.active].1;
        for (idx, (_, score)) in scores.iter().enumerate() {
            if *score > best {
                best = *score;
                winner = idx;
            }
        }

        for (idx, frame) in self.frames.iter_mut().enumerate() {
            if idx == winner {
                frame.boost(WINNER_BOOST);
            } else {
                frame.suppress(LOSER_DECAY);
            }
        }
        self.active = winner;
        &self.frames[self.active]
    }

    /// Filters `registered` down to the active frame's affordances and lists
    /// which salient/backgrounded terms occur in `situation`.
    pub fn apply_frame(&self, situation: &str, registered: &[RegisteredAction]) -> FramedSituation {
        let frame = self.active();
        let situation_terms = tokenize(situation);

        let viable_actions = registered
            .iter()
            .filter(|action| frame.affordance_verbs().iter().any(|verb| action.mentions(verb)))
            .map(|action| action.name().to_string())
            .collect();
        let salient_found = frame
            .salient_terms()
            .iter()
            .filter(|term| situation_terms.contains(**term))
            .map(|term| term.to_string())
            .collect();
        let backgrounded_found = frame
            .backgrounded_terms()
            .iter()
            .filter(|term| situation_terms.contains(**term))
            .map(|term| term.to_string())
            .collect();

        FramedSituation {
            frame: frame.kind(),
            viable_actions,
            salient_found,
            backgrounded_found,
        }
    }

    /// When stuck, proposes the highest-activation frame other than the active one.
    ///
    /// Advisory only: the active frame is left unchanged.
    pub fn suggest_reframe(&self) -> Option<&Frame> {
        self.frames
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != self.active)
            .map(|(_, frame)| frame)
            .max_by(|a, b| {
                a.activation()
                    .partial_cmp(&b.activation())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
