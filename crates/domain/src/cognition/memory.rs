//! Episodic memory store.
//!
//! Append-only log of [`Episode`]s with relevance-scored recall. Episodes are
//! never edited; the only removal path is [`EpisodicMemory::prune`], which
//! drops the lowest-retention episodes once the store exceeds capacity.

use chrono::{DateTime, Utc};

use crate::common::{term_overlap, tokenize};
use crate::entities::Episode;
use crate::ids::EpisodeId;

/// Recall score weights.
const OVERLAP_WEIGHT: f64 = 0.3;
const IMPORTANCE_WEIGHT: f64 = 0.4;
const RECENCY_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of episodes retained after pruning
    pub capacity: usize,
    /// Age in seconds at which recency weight halves
    pub recency_half_life_secs: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            recency_half_life_secs: 600.0,
        }
    }
}

/// An episode returned by recall together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct RecalledEpisode {
    pub episode: Episode,
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EpisodicMemory {
    config: MemoryConfig,
    episodes: Vec<Episode>,
}

impl EpisodicMemory {
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            config,
            episodes: Vec::new(),
        }
    }

    /// Appends an episode, pruning if the store is over capacity.
    pub fn store(&mut self, episode: Episode, now: DateTime<Utc>) -> EpisodeId {
        let id = episode.id();
        self.episodes.push(episode);
        if self.episodes.len() > self.config.capacity {
            self.prune(now);
        }
        id
    }

    /// Episodes ranked by keyword overlap with `query`, importance and recency.
    ///
    /// With a non-empty query only episodes sharing at least one term are
    /// returned. With an empty query every episode (optionally filtered by
    /// tag) is ranked on importance and recency alone.
    pub fn recall(
        &self,
        query: &str,
        context_tag: Option<&str>,
        limit: usize,
        now: DateTime<Utc>,
    ) -> Vec<RecalledEpisode> {
        let query_terms = tokenize(query);
        let mut scored: Vec<RecalledEpisode> = self
            .episodes
            .iter()
            .filter(|ep| context_tag.map_or(true, |tag| ep.context_tag() == tag))
            .filter_map(|ep| {
                let overlap = term_overlap(&query_terms, ep.terms());
                if !query_terms.is_empty() && overlap == 0 {
                    return None;
                }
                let score = OVERLAP_WEIGHT * overlap as f64
                    + IMPORTANCE_WEIGHT * ep.importance()
                    + RECENCY_WEIGHT * self.recency(ep, now);
                Some(RecalledEpisode {
                    episode: ep.clone(),
                    score,
                })
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Removes the lowest-retention episodes until the store fits its capacity.
    ///
    /// Retention is `importance * (0.5 + 0.5 * recency)`. Surviving episodes
    /// keep their insertion order. Returns the number removed.
    pub fn prune(&mut self, now: DateTime<Utc>) -> usize {
        let excess = self.episodes.len().saturating_sub(self.config.capacity);
        if excess == 0 {
            return 0;
        }

        let mut ranked: Vec<(usize, f64)> = self
            .episodes
            .iter()
            .enumerate()
            .map(|(idx, ep)| (idx, ep.importance() * (0.5 + 0.5 * self.recency(ep, now))))
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut doomed: Vec<usize> = ranked.iter().take(excess).map(|(idx, _)| *idx).collect();
        doomed.sort_unstable();

        let mut position = 0;
        self.episodes.retain(|_| {
            let keep = doomed.binary_search(&position).is_err();
            position += 1;
            keep
        });
        excess
    }

    /// The `n` most recently stored episodes, newest first.
    pub fn recent(&self, n: usize) -> Vec<&Episode> {
        self.episodes.iter().rev().take(n).collect()
    }

    pub fn by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Episode> + 'a {
        self.episodes.iter().filter(move |ep| ep.context_tag() == tag)
    }

    pub fn get(&self, id: EpisodeId) -> Option<&Episode> {
        self.episodes.iter().find(|ep| ep.id() == id)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.iter()
    }

    fn recency(&self, episode: &Episode, now: DateTime<Utc>) -> f64 {
        let age_secs = (now - episode.timestamp()).num_milliseconds().max(0) as f64 / 1000.0;
        let half_life = self.config.recency_half_life_secs.max(1.0);
        0.5_f64.powf(age_secs / half_life)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::episode_tags;
    use chrono::Duration;

    fn episode(text: &str, importance: f64, at: DateTime<Utc>) -> Episode {
        Episode::builder(text, episode_tags::DECISION, at)
            .importance(importance)
            .build()
    }

    #[test]
    fn test_recall_requires_overlap() {
        let now = Utc::now();
        let mut memory = EpisodicMemory::default();
        memory.store(episode("drew a card", 0.5, now), now);
        memory.store(episode("moved the knight", 0.5, now), now);

        let recalled = memory.recall("card game", None, 10, now);
        assert_eq!(recalled.len(), 1);
        assert_eq!(recalled[0].episode.description(), "drew a card");
    }

    #[test]
    fn test_recall_prefers_important_episodes() {
        let now = Utc::now();
        let mut memory = EpisodicMemory::default();
        memory.store(episode("played a card", 0.1, now), now);
        memory.store(episode("played a card badly", 0.9, now), now);

        let recalled = memory.recall("card", None, 2, now);
        assert_eq!(recalled[0].episode.description(), "played a card badly");
        assert!(recalled[0].score > recalled[1].score);
    }

    #[test]
    fn test_recall_filters_by_tag() {
        let now = Utc::now();
        let mut memory = EpisodicMemory::default();
        memory.store(episode("card one", 0.5, now), now);
        memory.store(
            Episode::builder("card two", episode_tags::RESULT_FAILURE, now).build(),
            now,
        );
        let recalled = memory.recall("card", Some(episode_tags::RESULT_FAILURE), 10, now);
        assert_eq!(recalled.len(), 1);
        assert_eq!(recalled[0].episode.description(), "card two");
    }

    #[test]
    fn test_prune_drops_lowest_retention_and_keeps_order() {
        let now = Utc::now();
        let mut memory = EpisodicMemory::new(MemoryConfig {
            capacity: 2,
            recency_half_life_secs: 60.0,
        });
        let old = now - Duration::hours(2);
        memory.store(episode("ancient trivia", 0.2, old), now);
        memory.store(episode("key insight", 0.9, now), now);
        memory.store(episode("fresh detail", 0.6, now), now);

        assert_eq!(memory.len(), 2);
        let kept: Vec<&str> = memory.iter().map(|e| e.description()).collect();
        assert_eq!(kept, vec!["key insight", "fresh detail"]);
    }

    #[test]
    fn test_recent_is_newest_first() {
        let now = Utc::now();
        let mut memory = EpisodicMemory::default();
        memory.store(episode("first", 0.5, now), now);
        memory.store(episode("second", 0.5, now), now);
        let recent = memory.recent(1);
        assert_eq!(recent[0].description(), "second");
    }
}
