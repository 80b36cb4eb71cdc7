//! Per-connection negotiation session.

use std::collections::VecDeque;
use std::str::FromStr;

use serde_json::Value;

use gamemind_domain::ActionId;
use gamemind_shared::{
    ActionDefinition, ActionResultData, ContextData, IncomingMessage, OutgoingMessage,
};

use super::{
    ActionDecider, ActionOutcome, Effect, ForceRequest, NegotiationConfig, PendingAction,
    SessionState, TimerEvent,
};
use crate::stores::ActionRegistry;

/// Timer currently armed that keeps the session busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Armed {
    Retry,
    Drain,
}

/// Owns the registered actions, the pending action and the force queue for
/// one connection.
///
/// At most one action is in flight. While a result is awaited, or a retry or
/// drain timer is armed, incoming forces are queued in arrival order.
pub struct NegotiationSession {
    config: NegotiationConfig,
    registry: ActionRegistry,
    pending: Option<PendingAction>,
    armed: Option<Armed>,
    queue: VecDeque<ForceRequest>,
    next_id: ActionId,
    epoch: u64,
    game: Option<String>,
}

impl NegotiationSession {
    pub fn new(config: NegotiationConfig) -> Self {
        Self {
            config,
            registry: ActionRegistry::new(),
            pending: None,
            armed: None,
            queue: VecDeque::new(),
            next_id: ActionId::new(0),
            epoch: 0,
            game: None,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            SessionState::AwaitingResult
        } else {
            SessionState::Idle
        }
    }

    /// True while an action is pending or a retry/drain timer is armed.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.armed.is_some()
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn game(&self) -> Option<&str> {
        self.game.as_deref()
    }

    /// Parses and handles one text frame. Malformed frames change nothing.
    pub fn handle_text(&mut self, text: &str, decider: &mut dyn ActionDecider) -> Vec<Effect> {
        match IncomingMessage::parse(text) {
            Ok(message) => self.handle_message(message, decider),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed message");
                Vec::new()
            }
        }
    }

    pub fn handle_message(
        &mut self,
        message: IncomingMessage,
        decider: &mut dyn ActionDecider,
    ) -> Vec<Effect> {
        if let (Some(announced), Some(game)) = (self.game.as_deref(), message.game()) {
            if !game.is_empty() && game != announced {
                tracing::debug!(
                    announced = %announced,
                    game = %game,
                    command = message.command(),
                    "Message from a different game than announced"
                );
            }
        }

        match message {
            IncomingMessage::Startup { game } => {
                self.startup(game);
                Vec::new()
            }
            IncomingMessage::Context { data, .. } => {
                self.context(data, decider);
                Vec::new()
            }
            IncomingMessage::RegisterActions { data, .. } => {
                self.register(data.actions);
                Vec::new()
            }
            IncomingMessage::UnregisterActions { data, .. } => {
                self.unregister(&data.action_names);
                Vec::new()
            }
            IncomingMessage::ForceAction { data, .. } => self.force(data.into(), decider),
            IncomingMessage::ActionResult { data, .. } => self.result(data, decider),
            IncomingMessage::Unknown => {
                tracing::warn!("Dropping message with unknown command");
                Vec::new()
            }
        }
    }

    /// Resets the session for a (re)started game. Armed timers become stale.
    pub fn startup(&mut self, game: String) {
        tracing::info!(
            game = %game,
            dropped_actions = self.registry.len(),
            dropped_forces = self.queue.len(),
            had_pending = self.pending.is_some(),
            "Game startup, session reset"
        );
        self.registry.clear();
        self.queue.clear();
        self.pending = None;
        self.armed = None;
        self.epoch += 1;
        self.game = Some(game);
    }

    pub fn context(&mut self, data: ContextData, decider: &mut dyn ActionDecider) {
        tracing::debug!(silent = data.silent, "Context received");
        decider.observe_context(&data.message, data.silent);
    }

    pub fn register(&mut self, definitions: Vec<ActionDefinition>) {
        let report = self.registry.register(definitions);
        for (name, reason) in &report.rejected {
            tracing::warn!(action = %name, reason = %reason, "Rejected action registration");
        }
        tracing::debug!(
            added = ?report.added,
            replaced = ?report.replaced,
            total = self.registry.len(),
            "Actions registered"
        );
    }

    /// Removing the pending action's name does not cancel it; its result is
    /// still expected.
    pub fn unregister(&mut self, names: &[String]) {
        let removed = self.registry.unregister(names);
        if let Some(pending) = &self.pending {
            if removed.contains(&pending.name) {
                tracing::debug!(
                    action = %pending.name,
                    id = %pending.id,
                    "Pending action unregistered, still awaiting its result"
                );
            }
        }
        tracing::debug!(removed = ?removed, total = self.registry.len(), "Actions unregistered");
    }

    pub fn force(&mut self, request: ForceRequest, decider: &mut dyn ActionDecider) -> Vec<Effect> {
        if self.is_busy() {
            self.queue.push_back(request);
            tracing::warn!(
                queued = self.queue.len(),
                pending = ?self.pending.as_ref().map(|p| p.id),
                "Force received while busy, queued"
            );
            return Vec::new();
        }
        self.dispatch(request, decider)
    }

    pub fn result(&mut self, data: ActionResultData, decider: &mut dyn ActionDecider) -> Vec<Effect> {
        let Some(pending) = self.pending.as_ref() else {
            tracing::warn!(id = %data.id, "Result with no pending action, ignored");
            return Vec::new();
        };
        let matches = ActionId::from_str(&data.id).is_ok_and(|id| id == pending.id);
        if !matches {
            tracing::warn!(
                id = %data.id,
                expected = %pending.id,
                "Result id does not match pending action, ignored"
            );
            return Vec::new();
        }
        let Some(pending) = self.pending.take() else {
            return Vec::new();
        };

        let outcome = ActionOutcome {
            id: pending.id,
            name: pending.name.clone(),
            success: data.success,
            message: data.message,
            still_registered: self.registry.contains(&pending.name),
        };
        decider.observe_result(&outcome);

        if outcome.success {
            tracing::debug!(action = %pending.name, id = %pending.id, "Action succeeded");
            return self.schedule_drain();
        }

        let failures = pending.attempt + 1;
        if self.config.max_retries != 0 && failures > self.config.max_retries {
            tracing::warn!(
                action = %pending.name,
                failures,
                "Action kept failing, giving up"
            );
            return self.schedule_drain();
        }

        tracing::info!(
            action = %pending.name,
            id = %pending.id,
            attempt = failures,
            delay_ms = self.config.retry_delay.as_millis() as u64,
            message = ?outcome.message,
            "Action failed, retry scheduled"
        );
        self.armed = Some(Armed::Retry);
        vec![Effect::Schedule {
            after: self.config.retry_delay,
            event: TimerEvent::RetryDue {
                epoch: self.epoch,
                action: pending.name,
                params: pending.params,
                attempt: failures,
            },
        }]
    }

    pub fn handle_timer(&mut self, event: TimerEvent, decider: &mut dyn ActionDecider) -> Vec<Effect> {
        if event.epoch() != self.epoch {
            tracing::debug!(event = ?event, "Stale timer ignored");
            return Vec::new();
        }

        match event {
            TimerEvent::RetryDue {
                action,
                params,
                attempt,
                ..
            } => {
                self.armed = None;
                if !self.registry.contains(&action) {
                    tracing::warn!(action = %action, "Retry dropped, action no longer registered");
                    return self.schedule_drain();
                }
                self.emit(action, params, attempt)
            }
            TimerEvent::DrainDue { .. } => {
                self.armed = None;
                if self.pending.is_some() {
                    return Vec::new();
                }
                match self.queue.pop_front() {
                    Some(request) => self.dispatch(request, decider),
                    None => Vec::new(),
                }
            }
            TimerEvent::ResultTimeout { id, .. } => {
                if self.pending.as_ref().map(|p| p.id) != Some(id) {
                    return Vec::new();
                }
                self.pending = None;
                tracing::warn!(id = %id, "No result before timeout, pending action cleared");
                self.schedule_drain()
            }
        }
    }

    /// Decides and emits for a force known to arrive while not busy.
    fn dispatch(&mut self, request: ForceRequest, decider: &mut dyn ActionDecider) -> Vec<Effect> {
        let candidates = self.registry.candidates(&request.action_names);
        if candidates.is_empty() {
            tracing::warn!(
                requested = ?request.action_names,
                "Force matches no registered action, dropped"
            );
            return self.schedule_drain();
        }

        let Some(decision) = decider.decide(&request, &candidates, self.registry.actions()) else {
            tracing::warn!(requested = ?request.action_names, "No decision for force, dropped");
            return self.schedule_drain();
        };

        if !candidates.iter().any(|c| c.name() == decision.action) {
            tracing::warn!(
                action = %decision.action,
                "Decider chose an action outside the candidates, dropped"
            );
            return self.schedule_drain();
        }

        self.emit(decision.action, decision.params, 0)
    }

    fn emit(&mut self, name: String, params: Option<Value>, attempt: u32) -> Vec<Effect> {
        let id = self.next_id;
        let message = match OutgoingMessage::action(id.to_string(), name.clone(), params.as_ref()) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(action = %name, error = %e, "Could not encode action, dropped");
                return self.schedule_drain();
            }
        };
        self.next_id = id.next();

        tracing::info!(action = %name, id = %id, attempt, "Action sent");
        self.pending = Some(PendingAction {
            id,
            name,
            params,
            attempt,
        });

        let mut effects = vec![Effect::Send(message)];
        if let Some(after) = self.config.result_timeout {
            effects.push(Effect::Schedule {
                after,
                event: TimerEvent::ResultTimeout {
                    epoch: self.epoch,
                    id,
                },
            });
        }
        effects
    }

    fn schedule_drain(&mut self) -> Vec<Effect> {
        if self.queue.is_empty() || self.is_busy() {
            return Vec::new();
        }
        self.armed = Some(Armed::Drain);
        vec![Effect::Schedule {
            after: self.config.drain_delay,
            event: TimerEvent::DrainDue { epoch: self.epoch },
        }]
    }
}
