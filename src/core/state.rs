//! Pipeline state - the shared key-value mapping one run accumulates

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Shared state for one pipeline run
///
/// Every reasoning unit reads the keys written by the units before it and
/// writes at most one key of its own. Values are either plain text or
/// structured JSON; both render into instruction templates as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    values: HashMap<String, Value>,
}

impl PipelineState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a value, overwriting any earlier write to the same key
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Check whether a key has been written
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// All keys currently set
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Render a state value for template substitution
    ///
    /// Text values render bare (no surrounding quotes); structured values
    /// render as canonical JSON.
    pub fn render_value(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}
