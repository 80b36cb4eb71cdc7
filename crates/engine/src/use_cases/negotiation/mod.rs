//! Action negotiation - the single-in-flight protocol state machine.
//!
//! [`NegotiationSession`] is a pure transition function: each inbound
//! message or fired timer yields a list of [`Effect`]s. [`SessionDriver`]
//! owns a session plus its decider and turns those effects into WebSocket
//! frames and tokio timers.

mod driver;
mod session;

use std::time::Duration;

use serde_json::Value;

use gamemind_domain::{ActionId, RegisteredAction};
use gamemind_shared::{ForceActionData, OutgoingMessage};

pub use driver::{DriverEvent, SessionDriver, SessionHandle};
pub use session::NegotiationSession;

/// Timing and retry policy for a session.
#[derive(Debug, Clone)]
pub struct NegotiationConfig {
    /// Delay before a failed action is re-sent
    pub retry_delay: Duration,
    /// Delay before the next queued force is processed
    pub drain_delay: Duration,
    /// Consecutive failures of one action before giving up (0 = unlimited)
    pub max_retries: u32,
    /// Clear a pending action that never got a result (None = wait forever)
    pub result_timeout: Option<Duration>,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_millis(1000),
            drain_delay: Duration::from_millis(500),
            max_retries: 5,
            result_timeout: None,
        }
    }
}

/// Observable protocol state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResult,
}

/// The action currently awaiting a result.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub id: ActionId,
    pub name: String,
    pub params: Option<Value>,
    /// 0 for the first send, incremented on every retry
    pub attempt: u32,
}

/// A force, as handed to the decider.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceRequest {
    pub state: Option<String>,
    pub query: String,
    pub action_names: Vec<String>,
    pub ephemeral: bool,
}

impl ForceRequest {
    /// State and query joined into one situation description.
    pub fn situation(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.trim().is_empty() => format!("{}\n{}", state, self.query),
            _ => self.query.clone(),
        }
    }
}

impl From<ForceActionData> for ForceRequest {
    fn from(data: ForceActionData) -> Self {
        Self {
            state: data.state,
            query: data.query,
            action_names: data.action_names,
            ephemeral: data.ephemeral_context,
        }
    }
}

/// What the decider chose.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: String,
    pub params: Option<Value>,
}

/// A resolved action, reported back to the decider.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub id: ActionId,
    pub name: String,
    pub success: bool,
    pub message: Option<String>,
    /// False when the game unregistered the action while it was pending
    pub still_registered: bool,
}

/// The seam between the protocol and whatever chooses actions.
#[cfg_attr(test, mockall::automock)]
pub trait ActionDecider: Send {
    /// Picks one of `candidates`. `registered` is every action the game
    /// currently allows, for context. `None` drops the force.
    fn decide(
        &mut self,
        request: &ForceRequest,
        candidates: &[RegisteredAction],
        registered: &[RegisteredAction],
    ) -> Option<Decision>;

    fn observe_result(&mut self, outcome: &ActionOutcome);

    fn observe_context(&mut self, message: &str, silent: bool);
}

/// Deferred work the driver must schedule.
///
/// Every event carries the session epoch at arming time; a `startup`
/// bumps the epoch so earlier timers become no-ops.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    RetryDue {
        epoch: u64,
        action: String,
        params: Option<Value>,
        attempt: u32,
    },
    DrainDue {
        epoch: u64,
    },
    ResultTimeout {
        epoch: u64,
        id: ActionId,
    },
}

impl TimerEvent {
    pub fn epoch(&self) -> u64 {
        match self {
            TimerEvent::RetryDue { epoch, .. }
            | TimerEvent::DrainDue { epoch }
            | TimerEvent::ResultTimeout { epoch, .. } => *epoch,
        }
    }
}

/// Output of a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Send(OutgoingMessage),
    Schedule { after: Duration, event: TimerEvent },
}
