//! Relevance realization over a decaying salience landscape.
//!
//! The landscape holds [`SalienceNode`]s whose activation decays exponentially
//! with wall-clock time between updates. Each update strengthens one node and
//! Hebbian-links it to the nodes currently in focus.
//!
//! Ranking ([`SalienceLandscape::realize_relevance`]) computes a keyword and
//! spreading-activation base score, then re-scores every candidate under the
//! four opponent-process dials in [`OpponentAxes`]. Two nodes with identical
//! keyword overlap can therefore rank differently purely because of the dials.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Utc};

use crate::common::{term_overlap, tokenize};
use crate::entities::{Episode, SalienceNode};
use crate::error::DomainError;
use crate::ids::{EpisodeId, NodeId};
use crate::value_objects::OpponentAxes;

const QUERY_MATCH_WEIGHT: f64 = 0.3;
const CONTEXT_MATCH_WEIGHT: f64 = 0.1;
const SPREADING_WEIGHT: f64 = 0.2;
const AXIS_WEIGHT: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct LandscapeConfig {
    /// Exponential decay rate per second
    pub decay_rate: f64,
    /// Fraction of the initial activation added when an existing node is seen again
    pub learning_rate: f64,
    /// Activation at or above which a node may enter focus
    pub focus_threshold: f64,
    /// Maximum number of focal nodes
    pub focus_capacity: usize,
    /// Hebbian link increment scale
    pub hebbian_rate: f64,
    /// Nodes whose activation falls under this are evicted
    pub eviction_floor: f64,
    /// Maximum number of nodes kept
    pub capacity: usize,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            decay_rate: 0.01,
            learning_rate: 0.5,
            focus_threshold: 0.6,
            focus_capacity: 7,
            hebbian_rate: 0.1,
            eviction_floor: 0.05,
            capacity: 256,
        }
    }
}

/// Per-axis contributions to a node's final score.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisContributions {
    pub exploration: f64,
    pub breadth: f64,
    pub stability: f64,
    pub speed: f64,
}

impl AxisContributions {
    pub fn total(&self) -> f64 {
        self.exploration + self.breadth + self.stability + self.speed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceScore {
    pub node_id: NodeId,
    pub content: String,
    pub episode_id: Option<EpisodeId>,
    pub activation: f64,
    pub base_score: f64,
    pub axes: AxisContributions,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SalienceLandscape {
    config: LandscapeConfig,
    nodes: HashMap<NodeId, SalienceNode>,
    index: HashMap<String, NodeId>,
    focus: Vec<NodeId>,
    last_update: Option<DateTime<Utc>>,
}

impl SalienceLandscape {
    pub fn new(config: LandscapeConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Decays the landscape to `now`, then creates or strengthens the node for
    /// `content` and links it to the current focus.
    pub fn update_landscape(
        &mut self,
        content: &str,
        initial_activation: f64,
        now: DateTime<Utc>,
    ) -> Result<NodeId, DomainError> {
        let key = normalize(content);
        if key.is_empty() {
            return Err(DomainError::validation("Salience content cannot be empty"));
        }
        let initial = if initial_activation.is_finite() {
            initial_activation.clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.decay_to(now);

        let id = match self.index.get(&key).copied() {
            Some(id) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    let target = (node.activation() + self.config.learning_rate * initial).min(1.0);
                    node.set_activation(target);
                }
                id
            }
            None => {
                let node = SalienceNode::new(content.trim(), initial);
                let id = node.id();
                self.nodes.insert(id, node);
                self.index.insert(key, id);
                id
            }
        };

        self.strengthen_links(id);
        self.evict(id);
        self.repartition();
        Ok(id)
    }

    /// Feeds an episode into the landscape, using its importance as activation.
    pub fn observe_episode(
        &mut self,
        episode: &Episode,
        now: DateTime<Utc>,
    ) -> Result<NodeId, DomainError> {
        let id = self.update_landscape(
            &episode.salience_text(),
            episode.importance().max(self.config.eviction_floor * 2.0),
            now,
        )?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.attach_episode(episode.id());
        }
        Ok(id)
    }

    /// Ranks nodes matching `query` (or `context_terms`) under the opponent axes.
    ///
    /// Only nodes with a direct keyword match are candidates; spreading
    /// activation from other matching neighbours adds to their base score.
    pub fn realize_relevance(
        &self,
        query: &str,
        context_terms: &[String],
        limit: usize,
        axes: &OpponentAxes,
    ) -> Vec<RelevanceScore> {
        if self.nodes.is_empty() || limit == 0 {
            return Vec::new();
        }
        let axes = axes.clamped();
        let query_terms = tokenize(query);
        let context: BTreeSet<String> = context_terms.iter().flat_map(|t| tokenize(t)).collect();

        let direct: HashMap<NodeId, f64> = self
            .nodes
            .iter()
            .map(|(id, node)| {
                let score = QUERY_MATCH_WEIGHT * term_overlap(&query_terms, node.terms()) as f64
                    + CONTEXT_MATCH_WEIGHT * term_overlap(&context, node.terms()) as f64;
                (*id, score)
            })
            .collect();

        let mean_activation = self.mean_activation();
        let max_connectivity = self
            .nodes
            .values()
            .map(SalienceNode::connectivity)
            .fold(0.0_f64, f64::max);
        let focal: HashSet<NodeId> = self.focus.iter().copied().collect();

        let mut scored: Vec<RelevanceScore> = self
            .nodes
            .values()
            .filter(|node| direct.get(&node.id()).copied().unwrap_or(0.0) > 0.0)
            .map(|node| {
                let spreading: f64 = node
                    .links()
                    .iter()
                    .filter(|(other, _)| direct.get(*other).copied().unwrap_or(0.0) > 0.0)
                    .map(|(_, weight)| SPREADING_WEIGHT * weight)
                    .sum();
                let base = direct.get(&node.id()).copied().unwrap_or(0.0) + spreading;

                let activation = node.activation();
                let connectedness = if max_connectivity > 0.0 {
                    node.connectivity() / max_connectivity
                } else {
                    0.0
                };
                let contributions = AxisContributions {
                    exploration: AXIS_WEIGHT
                        * (axes.exploration * (mean_activation - activation).max(0.0)
                            + (1.0 - axes.exploration) * (activation - mean_activation).max(0.0)),
                    breadth: AXIS_WEIGHT
                        * (axes.breadth * (1.0 - connectedness)
                            + (1.0 - axes.breadth) * connectedness),
                    stability: AXIS_WEIGHT
                        * if focal.contains(&node.id()) {
                            1.0 - axes.stability
                        } else {
                            axes.stability
                        },
                    speed: AXIS_WEIGHT * (axes.speed * activation + (1.0 - axes.speed) * base),
                };

                RelevanceScore {
                    node_id: node.id(),
                    content: node.content().to_string(),
                    episode_id: node.episode_id(),
                    activation,
                    base_score: base,
                    axes: contributions,
                    score: base + contributions.total(),
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.content.cmp(&b.content))
        });
        scored.truncate(limit);
        scored
    }

    pub fn node(&self, id: NodeId) -> Option<&SalienceNode> {
        self.nodes.get(&id)
    }

    /// Looks a node up by its content (case- and whitespace-insensitive).
    pub fn find(&self, content: &str) -> Option<&SalienceNode> {
        self.index
            .get(&normalize(content))
            .and_then(|id| self.nodes.get(id))
    }

    /// Focal nodes, highest activation first.
    pub fn focus(&self) -> &[NodeId] {
        &self.focus
    }

    pub fn peripheral(&self) -> Vec<NodeId> {
        self.nodes
            .keys()
            .filter(|id| !self.focus.contains(id))
            .copied()
            .collect()
    }

    pub fn is_focal(&self, id: NodeId) -> bool {
        self.focus.contains(&id)
    }

    pub fn mean_activation(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.nodes.values().map(SalienceNode::activation).sum::<f64>() / self.nodes.len() as f64
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn decay_to(&mut self, now: DateTime<Utc>) {
        if let Some(last) = self.last_update {
            let elapsed_secs = (now - last).num_milliseconds().max(0) as f64 / 1000.0;
            if elapsed_secs > 0.0 {
                let factor = (-self.config.decay_rate * elapsed_secs).exp();
                for node in self.nodes.values_mut() {
                    node.scale_activation(factor);
                }
            }
        }
        self.last_update = Some(match self.last_update {
            Some(last) if last > now => last,
            _ => now,
        });
    }

    fn strengthen_links(&mut self, updated: NodeId) {
        let Some(updated_activation) = self.nodes.get(&updated).map(SalienceNode::activation) else {
            return;
        };
        let partners: Vec<(NodeId, f64)> = self
            .focus
            .iter()
            .filter(|id| **id != updated)
            .filter_map(|id| self.nodes.get(id).map(|n| (*id, n.activation())))
            .collect();

        for (partner, partner_activation) in partners {
            let current = self
                .nodes
                .get(&updated)
                .map(|n| n.link_weight(partner))
                .unwrap_or(0.0);
            let weight =
                (current + self.config.hebbian_rate * updated_activation * partner_activation).min(1.0);
            if let Some(node) = self.nodes.get_mut(&updated) {
                node.set_link(partner, weight);
            }
            if let Some(node) = self.nodes.get_mut(&partner) {
                node.set_link(updated, weight);
            }
        }
    }

    fn evict(&mut self, protected: NodeId) {
        let floor = self.config.eviction_floor;
        let mut evicted: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.id() != protected && n.activation() < floor)
            .map(SalienceNode::id)
            .collect();

        let remaining = self.nodes.len() - evicted.len();
        if remaining > self.config.capacity {
            let mut survivors: Vec<(NodeId, f64)> = self
                .nodes
                .values()
                .filter(|n| n.id() != protected && !evicted.contains(&n.id()))
                .map(|n| (n.id(), n.activation()))
                .collect();
            survivors.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
            evicted.extend(
                survivors
                    .into_iter()
                    .take(remaining - self.config.capacity)
                    .map(|(id, _)| id),
            );
        }

        if evicted.is_empty() {
            return;
        }
        for id in &evicted {
            self.nodes.remove(id);
        }
        for node in self.nodes.values_mut() {
            for id in &evicted {
                node.remove_link(*id);
            }
        }
        self.index.retain(|_, id| !evicted.contains(id));
    }

    fn repartition(&mut self) {
        let mut focal: Vec<(NodeId, f64)> = self
            .nodes
            .values()
            .filter(|n| n.activation() >= self.config.focus_threshold)
            .map(|n| (n.id(), n.activation()))
            .collect();
        focal.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        focal.truncate(self.config.focus_capacity);
        self.focus = focal.into_iter().map(|(id, _)| id).collect();
    }
}

fn normalize(content: &str) -> String {
    content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
