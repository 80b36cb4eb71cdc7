//! Typed view of an action's JSON parameter schema.
//!
//! Games describe action parameters with a JSON-schema subset. The schema is
//! parsed once at registration into a [`SchemaNode`] tagged union so that
//! parameter generation can dispatch on the tag instead of inspecting raw JSON.

use std::collections::BTreeMap;

use serde_json::Value;

/// Default bounds for numeric properties that do not declare any.
pub const DEFAULT_NUMBER_MIN: f64 = 0.0;
pub const DEFAULT_NUMBER_MAX: f64 = 100.0;

/// One side of a numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberBound {
    pub value: f64,
    /// The bound itself is not an allowed value
    pub exclusive: bool,
}

impl NumberBound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: false,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            exclusive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A fixed set of allowed values (any JSON type).
    Enum(Vec<Value>),
    String,
    Number {
        minimum: Option<NumberBound>,
        maximum: Option<NumberBound>,
        integer: bool,
    },
    Boolean,
    Array,
    Object {
        properties: BTreeMap<String, SchemaNode>,
        required: Vec<String>,
    },
    /// No recognizable type information.
    Any,
}

impl SchemaNode {
    /// Parses a JSON-schema fragment. Unknown shapes degrade to [`SchemaNode::Any`].
    pub fn from_json(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return SchemaNode::Any;
        };

        if let Some(choices) = map.get("enum").and_then(Value::as_array) {
            return SchemaNode::Enum(choices.clone());
        }

        match schema_type(map.get("type")) {
            Some("string") => SchemaNode::String,
            Some("number") => SchemaNode::Number {
                minimum: bound(map, "minimum", "exclusiveMinimum"),
                maximum: bound(map, "maximum", "exclusiveMaximum"),
                integer: false,
            },
            Some("integer") => SchemaNode::Number {
                minimum: bound(map, "minimum", "exclusiveMinimum"),
                maximum: bound(map, "maximum", "exclusiveMaximum"),
                integer: true,
            },
            Some("boolean") => SchemaNode::Boolean,
            Some("array") => SchemaNode::Array,
            Some("object") => Self::object_from(map),
            _ if map.contains_key("properties") => Self::object_from(map),
            _ => SchemaNode::Any,
        }
    }

    fn object_from(map: &serde_json::Map<String, Value>) -> Self {
        let properties = map
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(name, schema)| (name.clone(), SchemaNode::from_json(schema)))
                    .collect()
            })
            .unwrap_or_default();
        let required = map
            .get("required")
            .and_then(Value::as_array)
            .map(|names| {
                names
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        SchemaNode::Object {
            properties,
            required,
        }
    }

    /// Short tag name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaNode::Enum(_) => "enum",
            SchemaNode::String => "string",
            SchemaNode::Number { integer: true, .. } => "integer",
            SchemaNode::Number { .. } => "number",
            SchemaNode::Boolean => "boolean",
            SchemaNode::Array => "array",
            SchemaNode::Object { .. } => "object",
            SchemaNode::Any => "any",
        }
    }
}

/// `type` may be a string or a list such as `["string", "null"]`.
fn schema_type(value: Option<&Value>) -> Option<&str> {
    match value? {
        Value::String(s) => Some(s.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

/// Reads one side of a range. Accepts the numeric `exclusiveMinimum` form as
/// well as the older boolean flag next to `minimum`.
fn bound(map: &serde_json::Map<String, Value>, inclusive: &str, exclusive: &str) -> Option<NumberBound> {
    let finite = |key: &str| map.get(key).and_then(Value::as_f64).filter(|v| v.is_finite());
    let flagged = map.get(exclusive).and_then(Value::as_bool).unwrap_or(false);

    match (finite(inclusive), finite(exclusive)) {
        (Some(inc), Some(exc)) => {
            // Both present: the tighter one wins.
            let tighter = if inclusive == "minimum" { exc >= inc } else { exc <= inc };
            Some(if tighter {
                NumberBound::exclusive(exc)
            } else {
                NumberBound::inclusive(inc)
            })
        }
        (Some(inc), None) if flagged => Some(NumberBound::exclusive(inc)),
        (Some(inc), None) => Some(NumberBound::inclusive(inc)),
        (None, Some(exc)) => Some(NumberBound::exclusive(exc)),
        (None, None) => None,
    }
}
