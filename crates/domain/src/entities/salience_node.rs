//! SalienceNode - an activation-weighted item in the salience landscape.

use std::collections::{BTreeSet, HashMap};

use crate::common::tokenize;
use crate::ids::{EpisodeId, NodeId};

#[derive(Debug, Clone, PartialEq)]
pub struct SalienceNode {
    id: NodeId,
    content: String,
    terms: BTreeSet<String>,
    activation: f64,
    links: HashMap<NodeId, f64>,
    episode_id: Option<EpisodeId>,
}

impl SalienceNode {
    pub fn new(content: impl Into<String>, activation: f64) -> Self {
        let content = content.into();
        Self {
            id: NodeId::new(),
            terms: tokenize(&content),
            content,
            activation: activation.clamp(0.0, 1.0),
            links: HashMap::new(),
            episode_id: None,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn terms(&self) -> &BTreeSet<String> {
        &self.terms
    }

    pub fn activation(&self) -> f64 {
        self.activation
    }

    pub fn episode_id(&self) -> Option<EpisodeId> {
        self.episode_id
    }

    pub fn links(&self) -> &HashMap<NodeId, f64> {
        &self.links
    }

    pub fn link_weight(&self, other: NodeId) -> f64 {
        self.links.get(&other).copied().unwrap_or(0.0)
    }

    /// Sum of all link weights.
    pub fn connectivity(&self) -> f64 {
        self.links.values().sum()
    }

    pub(crate) fn set_activation(&mut self, activation: f64) {
        self.activation = activation.clamp(0.0, 1.0);
    }

    pub(crate) fn scale_activation(&mut self, factor: f64) {
        self.activation = (self.activation * factor).clamp(0.0, 1.0);
    }

    pub(crate) fn set_link(&mut self, other: NodeId, weight: f64) {
        self.links.insert(other, weight.clamp(0.0, 1.0));
    }

    pub(crate) fn remove_link(&mut self, other: NodeId) {
        self.links.remove(&other);
    }

    pub(crate) fn attach_episode(&mut self, episode_id: EpisodeId) {
        self.episode_id = Some(episode_id);
    }
}
