//! WebSocket message types for game <-> agent communication
//!
//! One WebSocket text frame carries one JSON object. The `command` field
//! selects the variant; the payload, when any, lives under `data`.
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming a command string is a breaking change
//! - Unknown commands deserialize to `Unknown` for forward compatibility

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

// =============================================================================
// Incoming Messages (Game → Agent)
// =============================================================================

/// Messages from the game to the agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum IncomingMessage {
    /// The game (re)started; everything it registered before is gone
    #[serde(rename = "startup")]
    Startup {
        #[serde(default)]
        game: String,
    },
    /// Free-form situation update, never answered
    #[serde(rename = "context")]
    Context {
        #[serde(default)]
        game: String,
        data: ContextData,
    },
    #[serde(rename = "actions/register")]
    RegisterActions {
        #[serde(default)]
        game: String,
        data: RegisterActionsData,
    },
    #[serde(rename = "actions/unregister")]
    UnregisterActions {
        #[serde(default)]
        game: String,
        data: UnregisterActionsData,
    },
    /// Demand that one of `action_names` be chosen now
    #[serde(rename = "actions/force")]
    ForceAction {
        #[serde(default)]
        game: String,
        data: ForceActionData,
    },
    #[serde(rename = "action/result")]
    ActionResult {
        #[serde(default)]
        game: String,
        data: ActionResultData,
    },
    /// Unknown command for forward compatibility
    #[serde(other)]
    Unknown,
}

impl IncomingMessage {
    /// Parses one text frame.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Malformed)
    }

    /// Game name carried by the message, if the command has one.
    pub fn game(&self) -> Option<&str> {
        match self {
            Self::Startup { game }
            | Self::Context { game, .. }
            | Self::RegisterActions { game, .. }
            | Self::UnregisterActions { game, .. }
            | Self::ForceAction { game, .. }
            | Self::ActionResult { game, .. } => Some(game.as_str()),
            Self::Unknown => None,
        }
    }

    /// Wire command string, for logging.
    pub fn command(&self) -> &'static str {
        match self {
            Self::Startup { .. } => "startup",
            Self::Context { .. } => "context",
            Self::RegisterActions { .. } => "actions/register",
            Self::UnregisterActions { .. } => "actions/unregister",
            Self::ForceAction { .. } => "actions/force",
            Self::ActionResult { .. } => "action/result",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextData {
    pub message: String,
    /// Silent context is recorded with lower salience
    #[serde(default)]
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterActionsData {
    pub actions: Vec<ActionDefinition>,
}

/// An action as advertised by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema of the parameters; absent means no parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnregisterActionsData {
    pub action_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceActionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default)]
    pub query: String,
    /// When true the state text is not written to memory
    #[serde(default)]
    pub ephemeral_context: bool,
    pub action_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResultData {
    /// Correlation id of the action being resolved
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// =============================================================================
// Outgoing Messages (Agent → Game)
// =============================================================================

/// Messages from the agent to the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum OutgoingMessage {
    /// Ask the game to register all of its actions again
    #[serde(rename = "actions/reregister_all")]
    ReregisterAll,
    /// The chosen action
    #[serde(rename = "action")]
    Action { data: ActionData },
}

impl OutgoingMessage {
    /// Builds an `action` message; `params` are encoded as a JSON string.
    pub fn action(
        id: impl Into<String>,
        name: impl Into<String>,
        params: Option<&Value>,
    ) -> Result<Self, ProtocolError> {
        let data = params
            .map(serde_json::to_string)
            .transpose()
            .map_err(ProtocolError::Encode)?;
        Ok(Self::Action {
            data: ActionData {
                id: id.into(),
                name: name.into(),
                data,
            },
        })
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(ProtocolError::Encode)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionData {
    pub id: String,
    pub name: String,
    /// Parameters as a JSON-encoded string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}
