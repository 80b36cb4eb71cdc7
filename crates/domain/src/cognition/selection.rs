//! Decision/action selection.
//!
//! Combines the active frame, recalled memories, relevance results, emotion
//! and personality into a single chosen action plus generated parameters.

use serde_json::Value;

use crate::cognition::framing::FramedSituation;
use crate::cognition::memory::RecalledEpisode;
use crate::cognition::parameters::generate_parameters;
use crate::cognition::relevance::RelevanceScore;
use crate::common::contains_term;
use crate::entities::RegisteredAction;
use crate::random::RandomSource;
use crate::value_objects::{EmotionalState, PersonalityTraits};

const BASE_SCORE: f64 = 0.5;
const FRAME_AFFORDANCE_BONUS: f64 = 0.3;
const MEMORY_WEIGHT: f64 = 0.2;
const RELEVANCE_WEIGHT: f64 = 0.1;

/// Name the agent always picks when offered, used to fix its identity.
pub const DEFAULT_IDENTITY_ACTION: &str = "choose_name";

#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub identity_action: String,
    /// Size of the pool the non-exploring pick is drawn from
    pub top_k: usize,
    /// Exploration probability is `chaotic * exploration_scale`
    pub exploration_scale: f64,
    /// Jitter is uniform in `±jitter_scale / 2 * chaotic`
    pub jitter_scale: f64,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            identity_action: DEFAULT_IDENTITY_ACTION.to_string(),
            top_k: 3,
            exploration_scale: 0.3,
            jitter_scale: 0.4,
        }
    }
}

/// Everything the selector looks at for one decision.
#[derive(Debug, Clone, Copy)]
pub struct SelectionInput<'a> {
    pub candidates: &'a [RegisteredAction],
    pub framed: Option<&'a FramedSituation>,
    pub memories: &'a [RecalledEpisode],
    pub relevance: &'a [RelevanceScore],
    pub emotion: &'a EmotionalState,
    pub personality: &'a PersonalityTraits,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// The designated identity action was offered
    Identity,
    /// The exploration roll bypassed scoring
    Exploration,
    /// Picked among the top scored candidates
    Scored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub action: String,
    pub params: Option<Value>,
    pub reason: SelectionReason,
    /// Descending ranking; empty unless `reason` is `Scored`.
    pub ranking: Vec<ScoredCandidate>,
}

#[derive(Debug, Clone, Default)]
pub struct ActionSelector {
    config: SelectionConfig,
}

impl ActionSelector {
    pub fn new(config: SelectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Chooses one candidate and generates its parameters.
    ///
    /// Returns `None` only when there are no candidates.
    pub fn select(&self, input: SelectionInput<'_>, rng: &mut dyn RandomSource) -> Option<Selection> {
        if input.candidates.is_empty() {
            return None;
        }

        if let Some(identity) = input
            .candidates
            .iter()
            .find(|action| action.name() == self.config.identity_action)
        {
            return Some(Self::finish(identity, SelectionReason::Identity, Vec::new(), rng));
        }

        let chaotic = input.personality.chaotic();
        if rng.gen_bool(chaotic * self.config.exploration_scale) {
            let pick = &input.candidates[rng.gen_index(input.candidates.len())];
            return Some(Self::finish(pick, SelectionReason::Exploration, Vec::new(), rng));
        }

        let ranking = self.score_candidates(input, rng);
        let pool = self.config.top_k.max(1).min(ranking.len());
        let chosen = &ranking[rng.gen_index(pool)];
        let action = input
            .candidates
            .iter()
            .find(|action| action.name() == chosen.name)?;
        Some(Self::finish(action, SelectionReason::Scored, ranking, rng))
    }

    /// Scores every candidate, descending. Draws one jitter sample per candidate.
    pub fn score_candidates(
        &self,
        input: SelectionInput<'_>,
        rng: &mut dyn RandomSource,
    ) -> Vec<ScoredCandidate> {
        let jitter_amplitude = self.config.jitter_scale * input.personality.chaotic();
        let mut ranking: Vec<ScoredCandidate> = input
            .candidates
            .iter()
            .map(|action| {
                let jitter = (rng.next_f64() - 0.5) * jitter_amplitude;
                ScoredCandidate {
                    name: action.name().to_string(),
                    score: Self::heuristic_score(action, &input) + jitter,
                }
            })
            .collect();
        ranking.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        ranking
    }

    /// Deterministic part of a candidate's score.
    pub fn heuristic_score(action: &RegisteredAction, input: &SelectionInput<'_>) -> f64 {
        let name = action.name();

        let frame_bonus = match input.framed {
            Some(framed) if framed.is_viable(name) => FRAME_AFFORDANCE_BONUS,
            _ => 0.0,
        };

        let memory_bonus: f64 = input
            .memories
            .iter()
            .filter(|recalled| contains_term(recalled.episode.description(), name))
            .map(|recalled| {
                let weight = recalled.episode.importance() * MEMORY_WEIGHT;
                if recalled.episode.is_failure() {
                    -weight
                } else {
                    weight
                }
            })
            .sum();

        let relevance_bonus: f64 = input
            .relevance
            .iter()
            .filter(|node| contains_term(&node.content, name))
            .map(|node| RELEVANCE_WEIGHT * node.score.clamp(0.0, 1.0))
            .sum();

        let emotion_bonus = input.emotion.action_bonus(&action.search_text());

        BASE_SCORE + frame_bonus + memory_bonus + relevance_bonus + emotion_bonus
    }

    fn finish(
        action: &RegisteredAction,
        reason: SelectionReason,
        ranking: Vec<ScoredCandidate>,
        rng: &mut dyn RandomSource,
    ) -> Selection {
        Selection {
            action: action.name().to_string(),
            params: generate_parameters(action.schema(), rng),
            reason,
            ranking,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{episode_tags, Episode, FrameKind};
    use crate::random::testing::StdRandom;
    use crate::random::ScriptedRandom;
    use crate::value_objects::{Emotion, PersonalityTrait};
    use chrono::Utc;
    use serde_json::json;

    fn action(name: &str, description: &str) -> RegisteredAction {
        RegisteredAction::new(name, description, None).expect("valid action")
    }

    fn input<'a>(
        candidates: &'a [RegisteredAction],
        framed: Option<&'a FramedSituation>,
        memories: &'a [RecalledEpisode],
        emotion: &'a EmotionalState,
        personality: &'a PersonalityTraits,
    ) -> SelectionInput<'a> {
        SelectionInput {
            candidates,
            framed,
            memories,
            relevance: &[],
            emotion,
            personality,
        }
    }

    fn recalled(description: &str, tag: &str, importance: f64) -> RecalledEpisode {
        RecalledEpisode {
            episode: Episode::builder(description, tag, Utc::now())
                .importance(importance)
                .build(),
            score: 1.0,
        }
    }

    #[test]
    fn test_empty_candidates_select_nothing() {
        let selector = ActionSelector::default();
        let emotion = EmotionalState::default();
        let personality = PersonalityTraits::default();
        let mut rng = ScriptedRandom::constant(0.5);
        let selection = selector.select(input(&[], None, &[], &emotion, &personality), &mut rng);
        assert!(selection.is_none());
    }

    #[test]
    fn test_identity_action_always_wins() {
        let selector = ActionSelector::default();
        let candidates = vec![
            action("attack", "Strike"),
            action(DEFAULT_IDENTITY_ACTION, "Pick your name"),
        ];
        let emotion = EmotionalState::default();
        let personality = PersonalityTraits::default().with(PersonalityTrait::Chaotic, 1.0);
        // Every sample would trigger exploration if it were rolled.
        let mut rng = ScriptedRandom::constant(0.0);
        let selection = selector
            .select(input(&candidates, None, &[], &emotion, &personality), &mut rng)
            .expect("selection");
        assert_eq!(selection.action, DEFAULT_IDENTITY_ACTION);
        assert_eq!(selection.reason, SelectionReason::Identity);
    }

    #[test]
    fn test_exploration_roll_bypasses_scoring() {
        let selector = ActionSelector::default();
        let candidates = vec![action("a", ""), action("b", ""), action("c", "")];
        let emotion = EmotionalState::default();
        let personality = PersonalityTraits::default().with(PersonalityTrait::Chaotic, 1.0);
        // Roll 0.1 < 0.3 explores, then index sample 0.9 picks the last candidate.
        let mut rng = ScriptedRandom::new(vec![0.1, 0.9]);
        let selection = selector
            .select(input(&candidates, None, &[], &emotion, &personality), &mut rng)
            .expect("selection");
        assert_eq!(selection.reason, SelectionReason::Exploration);
        assert_eq!(selection.action, "c");
        assert!(selection.ranking.is_empty());
    }

    #[test]
    fn test_zero_chaos_picks_within_top_three() {
        let selector = ActionSelector::default();
        let candidates = vec![
            action("play_card", ""),
            action("move_piece", ""),
            action("place_token", ""),
            action("sing", ""),
        ];
        let framed = FramedSituation {
            frame: FrameKind::Strategy,
            viable_actions: vec![
                "play_card".to_string(),
                "move_piece".to_string(),
                "place_token".to_string(),
            ],
            salient_found: Vec::new(),
            backgrounded_found: Vec::new(),
        };
        let emotion = EmotionalState::default();
        let personality = PersonalityTraits::default().with(PersonalityTrait::Chaotic, 0.0);
        for sample in [0.0, 0.4, 0.99] {
            let mut rng = ScriptedRandom::constant(sample);
            let selection = selector
                .select(input(&candidates, Some(&framed), &[], &emotion, &personality), &mut rng)
                .expect("selection");
            assert_eq!(selection.reason, SelectionReason::Scored);
            assert_ne!(selection.action, "sing");
            assert_eq!(selection.ranking.len(), 4);
            assert_eq!(selection.ranking[3].name, "sing");
        }
    }

    #[test]
    fn test_memory_bonus_is_importance_weighted_and_signed() {
        let candidates = vec![action("attack", ""), action("defend", "")];
        let memories = vec![
            recalled("chose attack", episode_tags::DECISION, 1.0),
            recalled("defend failed", episode_tags::RESULT_FAILURE, 0.5),
        ];
        let emotion = EmotionalState::default();
        let personality = PersonalityTraits::default();
        let ctx = input(&candidates, None, &memories, &emotion, &personality);

        let attack = ActionSelector::heuristic_score(&candidates[0], &ctx);
        let defend = ActionSelector::heuristic_score(&candidates[1], &ctx);
        assert!((attack - 0.7).abs() < 1e-9);
        assert!((defend - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_emotion_coupling_shifts_score() {
        let candidates = vec![action("flee", "Run away")];
        let calm = EmotionalState::default();
        let scared = EmotionalState::new(Emotion::Fear, 1.0);
        let personality = PersonalityTraits::default();

        let neutral = ActionSelector::heuristic_score(
            &candidates[0],
            &input(&candidates, None, &[], &calm, &personality),
        );
        let fearful = ActionSelector::heuristic_score(
            &candidates[0],
            &input(&candidates, None, &[], &scared, &personality),
        );
        assert!(fearful > neutral);
    }

    #[test]
    fn test_parameters_generated_for_chosen_action() {
        let selector = ActionSelector::default();
        let candidates = vec![RegisteredAction::new(
            "move",
            "Move somewhere",
            Some(json!({
                "type": "object",
                "properties": { "direction": { "enum": ["left", "right"] } },
                "required": ["direction"]
            })),
        )
        .expect("valid action")];
        let emotion = EmotionalState::default();
        let personality = PersonalityTraits::default().with(PersonalityTrait::Chaotic, 0.0);
        let mut rng = ScriptedRandom::constant(0.0);
        let selection = selector
            .select(input(&candidates, None, &[], &emotion, &personality), &mut rng)
            .expect("selection");
        assert_eq!(selection.params, Some(json!({ "direction": "left" })));
    }

    #[test]
    fn test_chaotic_trait_raises_novel_selection_rate() {
        let selector = ActionSelector::default();
        let candidates = vec![
            action("play_card", "Play a card"),
            action("draw_card", "Draw a card"),
            action("pass_turn", "Pass"),
            action("hum", "Hum quietly"),
            action("wander", "Wander off"),
        ];
        let framed = FramedSituation {
            frame: FrameKind::Strategy,
            viable_actions: vec!["play_card".to_string(), "draw_card".to_string()],
            salient_found: Vec::new(),
            backgrounded_found: Vec::new(),
        };
        let memories = vec![
            recalled("play_card won the round", episode_tags::RESULT_SUCCESS, 0.9),
            recalled("pass_turn kept the lead", episode_tags::RESULT_SUCCESS, 0.6),
        ];
        let emotion = EmotionalState::default();
        let novel = ["hum", "wander"];

        let novel_rate = |chaotic: f64, seed: u64| {
            let personality = PersonalityTraits::default().with(PersonalityTrait::Chaotic, chaotic);
            let mut rng = StdRandom::seeded(seed);
            let trials = 2000;
            let hits = (0..trials)
                .filter_map(|_| {
                    selector.select(
                        input(&candidates, Some(&framed), &memories, &emotion, &personality),
                        &mut rng,
                    )
                })
                .filter(|selection| novel.contains(&selection.action.as_str()))
                .count();
            hits as f64 / trials as f64
        };

        let calm = novel_rate(0.1, 7);
        let wild = novel_rate(0.9, 7);
        assert!(wild > calm + 0.05, "calm={calm} wild={wild}");
    }
}
