use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

// Memory IDs
define_id!(EpisodeId);

// Salience landscape IDs
define_id!(NodeId);

/// Correlation key for an emitted action.
///
/// Ids are allocated from a per-session counter and are strictly increasing;
/// on the wire they travel as decimal strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ActionId(u64);

impl ActionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ActionId> for String {
    fn from(value: ActionId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for ActionId {
    type Error = crate::DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::str::FromStr for ActionId {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| crate::DomainError::parse(format!("Invalid action id: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_id_is_strictly_increasing() {
        let first = ActionId::new(0);
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "1");
    }

    #[test]
    fn test_action_id_parses_wire_string() {
        let id: ActionId = "42".parse().expect("valid id");
        assert_eq!(id.value(), 42);
        assert!("not-a-number".parse::<ActionId>().is_err());
    }

    #[test]
    fn test_action_id_serializes_as_string() {
        let json = serde_json::to_string(&ActionId::new(7)).expect("serialize");
        assert_eq!(json, "\"7\"");
    }
}
