//! Process configuration from YAML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
///
/// Covers the external collaborators only: the reasoning service and the
/// retail store. The workflow itself (unit sequence, instructions, state
/// keys) is static code and not configurable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouncilConfig {
    /// Reasoning service settings
    #[serde(default)]
    pub reasoning: ReasoningConfig,

    /// Retail store settings
    #[serde(default)]
    pub store: StoreConfig,
}

/// Reasoning service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningConfig {
    /// Base URL of the generateContent API
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Per-unit invocation timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cap on tool-call rounds within one invocation
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

/// Retail store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// SQLite database path; defaults to the platform data directory
    #[serde(default)]
    pub db_path: Option<String>,
}

fn default_api_base() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_tool_rounds() -> usize {
    8
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

impl Default for CouncilConfig {
    fn default() -> Self {
        Self {
            reasoning: ReasoningConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl CouncilConfig {
    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse configuration YAML")
    }

    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&contents)
    }
}
