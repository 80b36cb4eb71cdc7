//! Episode - a remembered event.
//!
//! Episodes are immutable once built: there are no setters, and importance is
//! fixed at construction (never renormalized after the fact).

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::tokenize;
use crate::ids::EpisodeId;
use crate::value_objects::EmotionalSnapshot;

/// Context tags written by the agent.
pub mod tags {
    pub const DECISION: &str = "decision";
    pub const RESULT_SUCCESS: &str = "result_success";
    pub const RESULT_FAILURE: &str = "result_failure";
    pub const CONTEXT: &str = "context";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    id: EpisodeId,
    timestamp: DateTime<Utc>,
    description: String,
    context_tag: String,
    outcome: Option<String>,
    importance: f64,
    emotion: EmotionalSnapshot,
    #[serde(skip)]
    terms: BTreeSet<String>,
}

impl Episode {
    pub fn builder(
        description: impl Into<String>,
        context_tag: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> EpisodeBuilder {
        EpisodeBuilder {
            description: description.into(),
            context_tag: context_tag.into(),
            timestamp,
            outcome: None,
            importance: 0.5,
            emotion: EmotionalSnapshot::default(),
        }
    }

    pub fn id(&self) -> EpisodeId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn context_tag(&self) -> &str {
        &self.context_tag
    }

    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    pub fn importance(&self) -> f64 {
        self.importance
    }

    pub fn emotion(&self) -> &EmotionalSnapshot {
        &self.emotion
    }

    /// Keyword terms from the description and outcome.
    pub fn terms(&self) -> &BTreeSet<String> {
        &self.terms
    }

    /// True for episodes recording a failed action.
    pub fn is_failure(&self) -> bool {
        self.context_tag == tags::RESULT_FAILURE
    }

    /// Text used to seed the salience landscape.
    pub fn salience_text(&self) -> String {
        match &self.outcome {
            Some(outcome) if !outcome.is_empty() => format!("{} {}", self.description, outcome),
            _ => self.description.clone(),
        }
    }
}

pub struct EpisodeBuilder {
    description: String,
    context_tag: String,
    timestamp: DateTime<Utc>,
    outcome: Option<String>,
    importance: f64,
    emotion: EmotionalSnapshot,
}

impl EpisodeBuilder {
    pub fn outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Importance, clamped to `[0, 1]`.
    pub fn importance(mut self, importance: f64) -> Self {
        self.importance = if importance.is_finite() {
            importance.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    pub fn emotion(mut self, emotion: EmotionalSnapshot) -> Self {
        self.emotion = emotion;
        self
    }

    pub fn build(self) -> Episode {
        let mut terms = tokenize(&self.description);
        if let Some(outcome) = &self.outcome {
            terms.extend(tokenize(outcome));
        }
        Episode {
            id: EpisodeId::new(),
            timestamp: self.timestamp,
            description: self.description,
            context_tag: self.context_tag,
            outcome: self.outcome,
            importance: self.importance,
            emotion: self.emotion,
            terms,
        }
    }
}
