//! Instruction templates - bind unit instructions to prior state

use crate::core::state::PipelineState;
use regex::Regex;
use thiserror::Error;

/// Error raised when a template cannot be rendered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template references a key no earlier unit has written
    #[error("instruction references unset state key '{key}'")]
    MissingKey { key: String },
}

/// A validated instruction template
///
/// References to state keys use the `{{ key }}` form. The referenced keys
/// are enumerated once at construction so workflow wiring can be checked
/// before any run starts; rendering never substitutes a placeholder for a
/// missing key - it fails instead.
#[derive(Debug, Clone)]
pub struct InstructionTemplate {
    source: String,
    keys: Vec<String>,
}

fn placeholder_pattern() -> Regex {
    // Key references are snake_case identifiers.
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
}

impl InstructionTemplate {
    /// Create a template, scanning it for its key references
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let pattern = placeholder_pattern();

        let mut keys: Vec<String> = Vec::new();
        for capture in pattern.captures_iter(&source) {
            let key = capture[1].to_string();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        Self { source, keys }
    }

    /// The state keys this template consumes, in order of first reference
    pub fn required_keys(&self) -> &[String] {
        &self.keys
    }

    /// The raw template text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template against the current state
    ///
    /// Substitution is a single textual pass; values containing `{{ ... }}`
    /// are not re-expanded.
    pub fn render(&self, state: &PipelineState) -> Result<String, TemplateError> {
        for key in &self.keys {
            if !state.contains(key) {
                return Err(TemplateError::MissingKey { key: key.clone() });
            }
        }

        let pattern = placeholder_pattern();
        let rendered = pattern.replace_all(&self.source, |caps: &regex::Captures<'_>| {
            let value = state
                .get(&caps[1])
                .expect("presence of every key checked above");
            PipelineState::render_value(value)
        });

        Ok(rendered.into_owned())
    }
}
