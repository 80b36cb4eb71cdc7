//! Parameter generation from a typed action schema.
//!
//! One value is produced per *required* property of the root object, by tag:
//! enum picks one choice, numbers draw within declared bounds (default
//! `[0, 100]`, exclusive bounds honored), booleans flip a coin, free strings get a placeholder, and
//! arrays/objects are emitted empty.

use serde_json::{Map, Number, Value};

use crate::random::RandomSource;
use crate::value_objects::{NumberBound, SchemaNode, DEFAULT_NUMBER_MAX, DEFAULT_NUMBER_MIN};

pub const STRING_PLACEHOLDER: &str = "placeholder";

/// Generates the parameter object for an action, or `None` when it has no schema.
pub fn generate_parameters(schema: Option<&SchemaNode>, rng: &mut dyn RandomSource) -> Option<Value> {
    let schema = schema?;
    Some(match schema {
        SchemaNode::Object {
            properties,
            required,
        } => {
            let mut object = Map::new();
            for name in required {
                let value = properties
                    .get(name)
                    .map(|node| generate_value(node, rng))
                    .unwrap_or(Value::Null);
                object.insert(name.clone(), value);
            }
            Value::Object(object)
        }
        other => generate_value(other, rng),
    })
}

/// Generates a single value for a schema node.
pub fn generate_value(node: &SchemaNode, rng: &mut dyn RandomSource) -> Value {
    match node {
        SchemaNode::Enum(choices) => {
            if choices.is_empty() {
                Value::Null
            } else {
                choices[rng.gen_index(choices.len())].clone()
            }
        }
        SchemaNode::String => Value::String(STRING_PLACEHOLDER.to_string()),
        SchemaNode::Number {
            minimum,
            maximum,
            integer,
        } => {
            let (min, max) = bounds(*minimum, *maximum);
            if *integer {
                generate_integer(min, max, rng)
            } else {
                generate_float(min, max, rng)
            }
        }
        SchemaNode::Boolean => Value::Bool(rng.gen_bool(0.5)),
        SchemaNode::Array => Value::Array(Vec::new()),
        SchemaNode::Object { .. } => Value::Object(Map::new()),
        SchemaNode::Any => Value::Null,
    }
}

/// Fills in missing bounds with the `[0, 100]` default window.
fn bounds(minimum: Option<NumberBound>, maximum: Option<NumberBound>) -> (NumberBound, NumberBound) {
    match (minimum, maximum) {
        (Some(min), Some(max)) => (min, max),
        (Some(min), None) => (
            min,
            NumberBound::inclusive(min.value.max(DEFAULT_NUMBER_MIN) + DEFAULT_NUMBER_MAX),
        ),
        (None, Some(max)) => (
            NumberBound::inclusive((max.value - DEFAULT_NUMBER_MAX).min(DEFAULT_NUMBER_MIN)),
            max,
        ),
        (None, None) => (
            NumberBound::inclusive(DEFAULT_NUMBER_MIN),
            NumberBound::inclusive(DEFAULT_NUMBER_MAX),
        ),
    }
}

/// Uniform integer in the range, computed in `i128` so any `i64` window fits.
fn generate_integer(min: NumberBound, max: NumberBound, rng: &mut dyn RandomSource) -> Value {
    let low = if min.exclusive {
        min.value.floor() + 1.0
    } else {
        min.value.ceil()
    };
    let high = if max.exclusive {
        max.value.ceil() - 1.0
    } else {
        max.value.floor()
    };

    // Float-to-int casts saturate, and the bounds are finite.
    let low = (low as i128).max(i128::from(i64::MIN));
    let high = (high as i128).min(i128::from(i64::MAX));

    if low > high {
        tracing::warn!(
            minimum = min.value,
            maximum = max.value,
            "No integer fits the declared bounds, emitting null"
        );
        return Value::Null;
    }

    // At most 2^64, exact enough as f64 for a uniform draw.
    let span = (high - low) as u128 + 1;
    let offset = ((rng.next_f64() * span as f64) as u128).min(span - 1);
    i64::try_from(low + offset as i128)
        .map(|v| Value::Number(Number::from(v)))
        .unwrap_or(Value::Null)
}

/// Uniform float in the range; exclusive ends are never emitted.
fn generate_float(min: NumberBound, max: NumberBound, rng: &mut dyn RandomSource) -> Value {
    let fits = |v: f64| {
        (if min.exclusive { v > min.value } else { v >= min.value })
            && (if max.exclusive { v < max.value } else { v <= max.value })
    };

    let mut value = rng.gen_range_f64(min.value, max.value);
    if !fits(value) {
        value = min.value / 2.0 + max.value / 2.0;
    }
    if !fits(value) {
        tracing::warn!(
            minimum = min.value,
            maximum = max.value,
            "No number fits the declared bounds, emitting null"
        );
        return Value::Null;
    }
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
