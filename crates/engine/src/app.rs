//! Application state and composition.

use std::sync::Arc;

use crate::api::ConnectionManager;
use crate::infrastructure::{clock::SeededRandom, ports::ClockPort, settings::AgentConfig};
use crate::use_cases::agent::Agent;
use crate::use_cases::negotiation::{NegotiationConfig, NegotiationSession};

/// Main application state.
///
/// Holds configuration and shared infrastructure. Passed to HTTP/WebSocket
/// handlers via Axum state; per-connection sessions are built from it.
pub struct App {
    pub config: AgentConfig,
    pub clock: Arc<dyn ClockPort>,
    pub connections: Arc<ConnectionManager>,
}

impl App {
    pub fn new(config: AgentConfig, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            config,
            clock,
            connections: Arc::new(ConnectionManager::new()),
        }
    }

    pub fn negotiation_config(&self) -> NegotiationConfig {
        NegotiationConfig {
            retry_delay: self.config.retry_delay,
            drain_delay: self.config.drain_delay,
            max_retries: self.config.max_retries,
            result_timeout: self.config.result_timeout,
        }
    }

    /// A fresh session for a new connection.
    pub fn new_session(&self) -> NegotiationSession {
        NegotiationSession::new(self.negotiation_config())
    }

    /// A fresh agent for a new connection; nothing is shared between games.
    pub fn new_agent(&self) -> Agent {
        Agent::new(
            &self.config,
            Box::new(SeededRandom::from_optional_seed(self.config.rng_seed)),
            self.clock.clone(),
        )
    }
}
