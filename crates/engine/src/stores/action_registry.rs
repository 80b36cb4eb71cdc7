//! Registered-action set for one game session.

use std::collections::HashSet;

use gamemind_domain::RegisteredAction;
use gamemind_shared::ActionDefinition;

/// Outcome of one `actions/register` batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationReport {
    pub added: Vec<String>,
    /// Names that were already registered and got their definition replaced
    pub replaced: Vec<String>,
    /// Rejected entries with the reason (duplicate in batch, invalid definition)
    pub rejected: Vec<(String, String)>,
}

/// Actions the game currently allows, in registration order.
///
/// Names are unique. Only the negotiation session mutates this.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    actions: Vec<RegisteredAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a batch of definitions.
    ///
    /// A name repeated within the batch is rejected after its first occurrence.
    /// A name registered by an earlier batch is replaced in place.
    pub fn register(&mut self, definitions: Vec<ActionDefinition>) -> RegistrationReport {
        let mut report = RegistrationReport::default();
        let mut seen = HashSet::new();

        for definition in definitions {
            if !seen.insert(definition.name.clone()) {
                report
                    .rejected
                    .push((definition.name, "duplicate name in batch".to_string()));
                continue;
            }

            let action = match RegisteredAction::new(
                definition.name.clone(),
                definition.description,
                definition.schema,
            ) {
                Ok(action) => action,
                Err(e) => {
                    report.rejected.push((definition.name, e.to_string()));
                    continue;
                }
            };

            match self.actions.iter_mut().find(|a| a.name() == action.name()) {
                Some(existing) => {
                    *existing = action;
                    report.replaced.push(definition.name);
                }
                None => {
                    self.actions.push(action);
                    report.added.push(definition.name);
                }
            }
        }
        report
    }

    /// Removes the named actions, returning the names that were present.
    pub fn unregister(&mut self, names: &[String]) -> Vec<String> {
        let doomed: HashSet<&str> = names.iter().map(String::as_str).collect();
        let mut removed = Vec::new();
        self.actions.retain(|action| {
            if doomed.contains(action.name()) {
                removed.push(action.name().to_string());
                false
            } else {
                true
            }
        });
        removed
    }

    /// Registered actions among `names`, in the order requested, without repeats.
    pub fn candidates(&self, names: &[String]) -> Vec<RegisteredAction> {
        let mut seen = HashSet::new();
        names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| self.get(name).cloned())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredAction> {
        self.actions.iter().find(|action| action.name() == name)
    }

    /// Every registered action, in registration order.
    pub fn actions(&self) -> &[RegisteredAction] {
        &self.actions
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(RegisteredAction::name).collect()
    }
}
