//! The deciding agent.
//!
//! Wires memory, the salience landscape, framing and the selector together
//! behind the [`ActionDecider`] seam the negotiation session calls.

use std::sync::Arc;

use gamemind_domain::{
    episode_tags, ActionSelector, Emotion, EmotionalState, Episode, EpisodicMemory, FramingSystem,
    MemoryConfig, OpponentAxes, PersonalityTraits, RandomSource, RegisteredAction,
    SalienceLandscape, SelectionConfig, SelectionInput,
};

use crate::infrastructure::ports::ClockPort;
use crate::infrastructure::settings::AgentConfig;
use crate::use_cases::negotiation::{ActionDecider, ActionOutcome, Decision, ForceRequest};

const SITUATION_ACTIVATION: f64 = 0.7;
const CONTEXT_ACTIVATION: f64 = 0.5;
const SILENT_CONTEXT_ACTIVATION: f64 = 0.3;
const RECALL_LIMIT: usize = 5;
const RELEVANCE_LIMIT: usize = 5;
const DECISION_IMPORTANCE: f64 = 0.5;
const SUCCESS_IMPORTANCE: f64 = 0.6;
const FAILURE_IMPORTANCE: f64 = 0.8;
const CONTEXT_IMPORTANCE: f64 = 0.2;
const OUTCOME_EMOTION_DELTA: f64 = 0.2;
const EMOTION_DECAY: f64 = 0.9;
const STUCK_AFTER_FAILURES: u32 = 3;

pub struct Agent {
    memory: EpisodicMemory,
    landscape: SalienceLandscape,
    framing: FramingSystem,
    selector: ActionSelector,
    emotion: EmotionalState,
    personality: PersonalityTraits,
    rng: Box<dyn RandomSource>,
    clock: Arc<dyn ClockPort>,
    consecutive_failures: u32,
}

impl Agent {
    pub fn new(config: &AgentConfig, rng: Box<dyn RandomSource>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            memory: EpisodicMemory::new(MemoryConfig {
                capacity: config.memory_capacity,
                ..MemoryConfig::default()
            }),
            landscape: SalienceLandscape::default(),
            framing: FramingSystem::new(),
            selector: ActionSelector::new(SelectionConfig {
                identity_action: config.identity_action.clone(),
                ..SelectionConfig::default()
            }),
            emotion: EmotionalState::default(),
            personality: config.personality,
            rng,
            clock,
            consecutive_failures: 0,
        }
    }

    pub fn memory(&self) -> &EpisodicMemory {
        &self.memory
    }

    pub fn landscape(&self) -> &SalienceLandscape {
        &self.landscape
    }

    pub fn framing(&self) -> &FramingSystem {
        &self.framing
    }

    pub fn emotion(&self) -> &EmotionalState {
        &self.emotion
    }

    fn remember(&mut self, episode: Episode) {
        let now = self.clock.now();
        if let Err(e) = self.landscape.observe_episode(&episode, now) {
            tracing::debug!(error = %e, "Episode not added to salience landscape");
        }
        self.memory.store(episode, now);
    }

    fn touch_landscape(&mut self, content: &str, activation: f64) {
        let now = self.clock.now();
        if let Err(e) = self.landscape.update_landscape(content, activation, now) {
            tracing::debug!(error = %e, "Salience update skipped");
        }
    }
}

impl ActionDecider for Agent {
    fn decide(
        &mut self,
        request: &ForceRequest,
        candidates: &[RegisteredAction],
        registered: &[RegisteredAction],
    ) -> Option<Decision> {
        let situation = request.situation();
        let now = self.clock.now();
        self.touch_landscape(&situation, SITUATION_ACTIVATION);

        let axes = OpponentAxes::from_traits(&self.personality);
        let memories = self.memory.recall(&situation, None, RECALL_LIMIT, now);
        let context_terms: Vec<String> = candidates.iter().map(|c| c.name().to_string()).collect();
        let relevance =
            self.landscape
                .realize_relevance(&request.query, &context_terms, RELEVANCE_LIMIT, &axes);

        let frame = self
            .framing
            .select_frame(&situation, &self.personality, &self.emotion, registered)
            .kind();
        let framed = self.framing.apply_frame(&situation, registered);

        let selection = self.selector.select(
            SelectionInput {
                candidates,
                framed: Some(&framed),
                memories: &memories,
                relevance: &relevance,
                emotion: &self.emotion,
                personality: &self.personality,
            },
            self.rng.as_mut(),
        )?;

        tracing::debug!(
            action = %selection.action,
            frame = frame.name(),
            reason = ?selection.reason,
            viable = ?framed.viable_actions,
            recalled = memories.len(),
            "Decision made"
        );

        if !request.ephemeral {
            let episode = Episode::builder(
                format!("Chose {} for: {}", selection.action, situation),
                episode_tags::DECISION,
                now,
            )
            .importance(DECISION_IMPORTANCE)
            .emotion(self.emotion.snapshot())
            .build();
            self.remember(episode);
        }
        self.emotion.decay(EMOTION_DECAY);

        Some(Decision {
            action: selection.action,
            params: selection.params,
        })
    }

    fn observe_result(&mut self, outcome: &ActionOutcome) {
        let (emotion, tag, importance, verb) = if outcome.success {
            (Emotion::Joy, episode_tags::RESULT_SUCCESS, SUCCESS_IMPORTANCE, "succeeded")
        } else {
            (Emotion::Frustration, episode_tags::RESULT_FAILURE, FAILURE_IMPORTANCE, "failed")
        };
        self.emotion.feel(emotion, OUTCOME_EMOTION_DELTA);

        let mut builder = Episode::builder(
            format!("{} {}", outcome.name, verb),
            tag,
            self.clock.now(),
        )
        .importance(importance)
        .emotion(self.emotion.snapshot());
        if let Some(message) = outcome.message.as_deref().filter(|m| !m.trim().is_empty()) {
            builder = builder.outcome(message);
        }
        self.remember(builder.build());

        if outcome.success {
            self.consecutive_failures = 0;
            return;
        }
        self.consecutive_failures += 1;
        if self.consecutive_failures >= STUCK_AFTER_FAILURES {
            match self.framing.suggest_reframe() {
                Some(frame) => tracing::info!(
                    active = self.framing.active().kind().name(),
                    suggested = frame.kind().name(),
                    failures = self.consecutive_failures,
                    "Stuck, reframe suggested"
                ),
                None => tracing::info!(failures = self.consecutive_failures, "Stuck, no reframe available"),
            }
            self.consecutive_failures = 0;
        }
    }

    fn observe_context(&mut self, message: &str, silent: bool) {
        if message.trim().is_empty() {
            tracing::debug!("Empty context ignored");
            return;
        }
        let activation = if silent {
            SILENT_CONTEXT_ACTIVATION
        } else {
            CONTEXT_ACTIVATION
        };
        self.touch_landscape(message, activation);

        let now = self.clock.now();
        let episode = Episode::builder(message, episode_tags::CONTEXT, now)
            .importance(CONTEXT_IMPORTANCE)
            .emotion(self.emotion.snapshot())
            .build();
        self.memory.store(episode, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::MockClockPort;
    use chrono::{TimeZone, Utc};
    use gamemind_domain::{ActionId, FrameKind, ScriptedRandom};
    use serde_json::json;

    fn agent(config: &AgentConfig) -> Agent {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().expect("valid time");
        Agent::new(
            config,
            Box::new(ScriptedRandom::constant(0.9)),
            Arc::new(FixedClock(now)),
        )
    }

    fn action(name: &str, description: &str) -> RegisteredAction {
        RegisteredAction::new(name, description, None).expect("valid action")
    }

    fn request(query: &str, names: &[&str], ephemeral: bool) -> ForceRequest {
        ForceRequest {
            state: Some("The board is set".to_string()),
            query: query.to_string(),
            action_names: names.iter().map(|n| n.to_string()).collect(),
            ephemeral,
        }
    }

    fn outcome(name: &str, success: bool) -> ActionOutcome {
        ActionOutcome {
            id: ActionId::new(0),
            name: name.to_string(),
            success,
            message: Some("the game said so".to_string()),
            still_registered: true,
        }
    }

    #[test]
    fn decides_among_candidates_and_remembers() {
        let mut agent = agent(&AgentConfig::default());
        let candidates = vec![action("attack", "Strike"), action("defend", "Block")];

        let decision = agent
            .decide(&request("choose", &["attack", "defend"], false), &candidates, &candidates)
            .expect("decision");
        assert!(["attack", "defend"].contains(&decision.action.as_str()));
        assert_eq!(decision.params, None);

        let decisions: Vec<_> = agent.memory().by_tag(episode_tags::DECISION).collect();
        assert_eq!(decisions.len(), 1);
        assert!(decisions[0].description().contains(&decision.action));
        assert!(!agent.landscape().is_empty());
    }

    #[test]
    fn ephemeral_force_is_not_remembered() {
        let mut agent = agent(&AgentConfig::default());
        let candidates = vec![action("attack", "Strike")];
        agent.decide(&request("choose", &["attack"], true), &candidates, &candidates);
        assert!(agent.memory().is_empty());
    }

    #[test]
    fn identity_action_wins() {
        let mut agent = agent(&AgentConfig::default());
        let candidates = vec![action("attack", "Strike"), action("choose_name", "Pick a name")];
        let decision = agent
            .decide(
                &request("who are you", &["attack", "choose_name"], false),
                &candidates,
                &candidates,
            )
            .expect("decision");
        assert_eq!(decision.action, "choose_name");
    }

    #[test]
    fn generates_parameters_from_schema() {
        let mut agent = agent(&AgentConfig::default());
        let candidates = vec![RegisteredAction::new(
            "move",
            "Move a piece",
            Some(json!({
                "type": "object",
                "properties": {
                    "column": { "type": "integer", "minimum": 0, "maximum": 6 },
                    "note": { "type": "string" }
                },
                "required": ["column"]
            })),
        )
        .expect("valid action")];
        let decision = agent
            .decide(&request("your move", &["move"], false), &candidates, &candidates)
            .expect("decision");
        let params = decision.params.expect("params");
        let column = params["column"].as_i64().expect("integer column");
        assert!((0..=6).contains(&column));
        assert!(params.get("note").is_none());
    }

    #[test]
    fn frame_follows_registry_not_just_force() {
        let mut informed = agent(&AgentConfig::default());
        let registered = vec![
            action("defend", "Raise shield"),
            action("heal", "Restore hp"),
            action("flee", "Run off"),
            action("hide", "Duck down"),
            action("wait", "Pass the turn"),
        ];
        let candidates = vec![action("wait", "Pass the turn")];

        let decision = informed
            .decide(&request("wait now", &["wait"], false), &candidates, &registered)
            .expect("decision");
        assert_eq!(decision.action, "wait");
        assert_eq!(informed.framing().active().kind(), FrameKind::Survival);

        let mut narrow = agent(&AgentConfig::default());
        narrow.decide(&request("wait now", &["wait"], false), &candidates, &candidates);
        assert_eq!(narrow.framing().active().kind(), FrameKind::Strategy);
    }

    #[test]
    fn results_shape_emotion_and_memory() {
        let mut agent = agent(&AgentConfig::default());

        agent.observe_result(&outcome("attack", false));
        assert_eq!(agent.emotion().primary(), Emotion::Frustration);
        let failures: Vec<_> = agent.memory().by_tag(episode_tags::RESULT_FAILURE).collect();
        assert_eq!(failures.len(), 1);
        assert!((failures[0].importance() - 0.8).abs() < 1e-9);
        assert_eq!(failures[0].outcome(), Some("the game said so"));

        agent.observe_result(&outcome("attack", true));
        agent.observe_result(&outcome("attack", true));
        let successes: Vec<_> = agent.memory().by_tag(episode_tags::RESULT_SUCCESS).collect();
        assert_eq!(successes.len(), 2);
        assert!((successes[0].importance() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn unregistered_result_is_processed() {
        let mut agent = agent(&AgentConfig::default());
        let mut gone = outcome("vanished", true);
        gone.still_registered = false;
        agent.observe_result(&gone);
        assert_eq!(agent.memory().len(), 1);
        assert_eq!(agent.emotion().primary(), Emotion::Joy);
    }

    #[test]
    fn repeated_failures_do_not_switch_frame() {
        let mut agent = agent(&AgentConfig::default());
        let before = agent.framing().active().kind();
        for _ in 0..STUCK_AFTER_FAILURES {
            agent.observe_result(&outcome("attack", false));
        }
        assert_eq!(agent.framing().active().kind(), before);
    }

    #[test]
    fn context_feeds_landscape_and_memory() {
        let mut clock = MockClockPort::new();
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).single().expect("valid time");
        clock.expect_now().returning(move || now);
        let mut agent = Agent::new(
            &AgentConfig::default(),
            Box::new(ScriptedRandom::constant(0.5)),
            Arc::new(clock),
        );

        agent.observe_context("A dragon appears on the ridge", false);
        agent.observe_context("", true);

        let contexts: Vec<_> = agent.memory().by_tag(episode_tags::CONTEXT).collect();
        assert_eq!(contexts.len(), 1);
        assert!(agent.landscape().find("A dragon appears on the ridge").is_some());
        assert_eq!(agent.landscape().len(), 1);
    }
}
