//! Conversion between [`Value`] and `serde_json::Value`.

use crate::value::{Container, Key, Value};
use serde_json::{Map, Number};
use std::sync::Arc;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(Arc::new(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => Value::Container(Arc::new(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect::<Container>(),
            )),
        }
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn container_to_json(container: &Container, out: &mut Map<String, serde_json::Value>) {
    if let Some(proto) = container.proto() {
        container_to_json(proto, out);
    }
    for (key, value) in container.iter() {
        if let Key::Str(name) = key {
            out.insert(name.clone(), value.to_json());
        }
    }
}

impl Value {
    /// Converts to plain JSON.
    ///
    /// Lossy: `undefined`, functions and symbols become `null`, non-finite
    /// numbers become `null`, symbol-keyed entries are dropped, and proto
    /// entries are flattened into the object (own entries win).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Undefined | Value::Null | Value::Function(_) | Value::Symbol(_) => {
                serde_json::Value::Null
            }
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Container(container) => {
                let mut out = Map::new();
                container_to_json(container, &mut out);
                serde_json::Value::Object(out)
            }
        }
    }
}
