//! Reasoning unit reply types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::store::StoreError;

/// Error types for reasoning invocations
#[derive(Debug, Error)]
pub enum ReasoningError {
    /// The reasoning service was unreachable or returned an error
    #[error("reasoning API error: {0}")]
    Api(String),

    /// The invocation did not complete in time
    #[error("reasoning timed out after {0} seconds")]
    Timeout(u64),

    /// A store tool call failed; carries the permission-denied case
    #[error("store tool call failed: {0}")]
    Tool(#[from] StoreError),

    /// The service answered with something the client cannot use
    #[error("malformed reasoning response: {0}")]
    Malformed(String),
}

impl ReasoningError {
    /// Whether this failure is a capability policy violation
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ReasoningError::Tool(StoreError::PermissionDenied { .. }))
    }
}

/// Payload produced by a reasoning unit: plain text or a structured value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UnitPayload {
    Text(String),
    Json(Value),
}

impl UnitPayload {
    /// Interpret a raw response: fenced or bare JSON becomes structured,
    /// anything else stays text.
    pub fn from_response(text: &str) -> Self {
        let candidate = strip_fences(text);
        if candidate.starts_with('{') || candidate.starts_with('[') {
            if let Ok(value) = serde_json::from_str::<Value>(candidate) {
                return UnitPayload::Json(value);
            }
        }
        UnitPayload::Text(text.trim().to_string())
    }

    /// The payload as a state value
    pub fn to_value(&self) -> Value {
        match self {
            UnitPayload::Text(s) => Value::String(s.clone()),
            UnitPayload::Json(v) => v.clone(),
        }
    }

    /// The payload as display text
    pub fn render(&self) -> String {
        match self {
            UnitPayload::Text(s) => s.clone(),
            UnitPayload::Json(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
        }
    }
}

/// Strip a ```json ... ``` (or plain ```) fence if the whole response is one
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop a language tag on the opening fence
    match body.split_once('\n') {
        Some((first_line, remainder)) if first_line.trim().chars().all(char::is_alphanumeric) => {
            remainder.trim()
        }
        _ => body.trim(),
    }
}

/// Reply from one reasoning invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitReply {
    pub payload: UnitPayload,
}

impl UnitReply {
    pub fn new(payload: UnitPayload) -> Self {
        Self { payload }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            payload: UnitPayload::Text(text.into()),
        }
    }

    pub fn json(value: Value) -> Self {
        Self {
            payload: UnitPayload::Json(value),
        }
    }
}
