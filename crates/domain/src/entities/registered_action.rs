//! An action the game currently allows.

use serde_json::Value;

use crate::common::contains_term;
use crate::error::DomainError;
use crate::value_objects::SchemaNode;

#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredAction {
    name: String,
    description: String,
    schema: Option<SchemaNode>,
    raw_schema: Option<Value>,
}

impl RegisteredAction {
    /// Creates an action, parsing the optional JSON schema.
    ///
    /// Returns a validation error for an empty name. A `null` or empty-object
    /// schema is treated as "no parameters".
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        schema: Option<Value>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("Action name cannot be empty"));
        }
        let raw_schema = schema.filter(|s| match s {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        });
        Ok(Self {
            name,
            description: description.into(),
            schema: raw_schema.as_ref().map(SchemaNode::from_json),
            raw_schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn schema(&self) -> Option<&SchemaNode> {
        self.schema.as_ref()
    }

    pub fn raw_schema(&self) -> Option<&Value> {
        self.raw_schema.as_ref()
    }

    /// True when the name or description mentions `verb` (case-insensitive).
    pub fn mentions(&self, verb: &str) -> bool {
        contains_term(&self.name, verb) || contains_term(&self.description, verb)
    }

    /// Name and description joined, for keyword scoring.
    pub fn search_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }
}
