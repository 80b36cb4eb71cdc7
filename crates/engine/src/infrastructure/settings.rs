//! Environment-driven agent configuration.
//!
//! Every variable is optional. A value that fails to parse is logged and the
//! default is used instead, so a typo never keeps the service from starting.

use std::str::FromStr;
use std::time::Duration;

use gamemind_domain::{PersonalityTrait, PersonalityTraits, DEFAULT_IDENTITY_ACTION};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;
pub const DEFAULT_DRAIN_DELAY_MS: u64 = 500;
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_MEMORY_CAPACITY: usize = 500;

/// Runtime configuration for the engine and the agent it hosts.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    /// Delay before a failed action is sent again
    pub retry_delay: Duration,
    /// Delay before the next queued force is processed
    pub drain_delay: Duration,
    /// Consecutive failures of one action before giving up (0 = unlimited)
    pub max_retries: u32,
    /// Give up on a pending action after this long (None = wait forever)
    pub result_timeout: Option<Duration>,
    pub identity_action: String,
    /// Seed for the agent's random source (None = OS entropy)
    pub rng_seed: Option<u64>,
    pub memory_capacity: usize,
    pub personality: PersonalityTraits,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            drain_delay: Duration::from_millis(DEFAULT_DRAIN_DELAY_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            result_timeout: None,
            identity_action: DEFAULT_IDENTITY_ACTION.to_string(),
            rng_seed: None,
            memory_capacity: DEFAULT_MEMORY_CAPACITY,
            personality: PersonalityTraits::default(),
        }
    }
}

impl AgentConfig {
    /// Reads `GAMEMIND_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut personality = PersonalityTraits::default();
        for personality_trait in PersonalityTrait::all() {
            let key = format!(
                "GAMEMIND_TRAIT_{}",
                personality_trait.display_name().to_ascii_uppercase()
            );
            if let Some(value) = parse_or_warn::<f64>(&key, get(&key)) {
                personality.set(*personality_trait, value);
            }
        }

        let result_timeout_secs =
            parse_or_warn::<u64>("GAMEMIND_RESULT_TIMEOUT_SECS", get("GAMEMIND_RESULT_TIMEOUT_SECS"))
                .unwrap_or(0);

        Self {
            host: get("GAMEMIND_HOST").unwrap_or(defaults.host),
            port: parse_or_warn("GAMEMIND_PORT", get("GAMEMIND_PORT")).unwrap_or(defaults.port),
            retry_delay: parse_or_warn::<u64>("GAMEMIND_RETRY_DELAY_MS", get("GAMEMIND_RETRY_DELAY_MS"))
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            drain_delay: parse_or_warn::<u64>("GAMEMIND_DRAIN_DELAY_MS", get("GAMEMIND_DRAIN_DELAY_MS"))
                .map(Duration::from_millis)
                .unwrap_or(defaults.drain_delay),
            max_retries: parse_or_warn("GAMEMIND_MAX_RETRIES", get("GAMEMIND_MAX_RETRIES"))
                .unwrap_or(defaults.max_retries),
            result_timeout: (result_timeout_secs > 0).then(|| Duration::from_secs(result_timeout_secs)),
            identity_action: get("GAMEMIND_IDENTITY_ACTION").unwrap_or(defaults.identity_action),
            rng_seed: parse_or_warn("GAMEMIND_RNG_SEED", get("GAMEMIND_RNG_SEED")),
            memory_capacity: parse_or_warn("GAMEMIND_MEMORY_CAPACITY", get("GAMEMIND_MEMORY_CAPACITY"))
                .unwrap_or(defaults.memory_capacity),
            personality,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_warn<T>(key: &str, raw: Option<String>) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = raw?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, value = %raw, error = %e, "Invalid setting, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AgentConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AgentConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
        assert_eq!(config.retry_delay, Duration::from_millis(1000));
        assert_eq!(config.drain_delay, Duration::from_millis(500));
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.result_timeout, None);
        assert_eq!(config.identity_action, "choose_name");
        assert_eq!(config.rng_seed, None);
        assert_eq!(config.memory_capacity, 500);
        assert_eq!(config.personality, PersonalityTraits::default());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("GAMEMIND_PORT", "9001"),
            ("GAMEMIND_RETRY_DELAY_MS", "20"),
            ("GAMEMIND_RESULT_TIMEOUT_SECS", "30"),
            ("GAMEMIND_RNG_SEED", "7"),
            ("GAMEMIND_TRAIT_CHAOTIC", "0.9"),
            ("GAMEMIND_TRAIT_INTELLIGENCE", "3"),
        ]);
        assert_eq!(config.port, 9001);
        assert_eq!(config.retry_delay, Duration::from_millis(20));
        assert_eq!(config.result_timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.rng_seed, Some(7));
        assert!((config.personality.chaotic() - 0.9).abs() < 1e-9);
        assert!((config.personality.intelligence() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config_from(&[
            ("GAMEMIND_PORT", "not-a-port"),
            ("GAMEMIND_MAX_RETRIES", "-1"),
            ("GAMEMIND_TRAIT_CAUTION", "very"),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_retries, DEFAULT_MAX_RETRIES);
        assert!((config.personality.get(PersonalityTrait::Caution) - 0.5).abs() < 1e-9);
    }
}
