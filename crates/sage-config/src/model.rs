// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Sage report pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Sage configuration.
///
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SageConfig {
    /// Process-level settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// LLM gateway settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Data source used for schema context.
    #[serde(default)]
    pub data_source: DataSourceConfig,

    /// Prompt composition settings.
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Placeholder written in place of secrets when a config is displayed.
pub const REDACTED: &str = "[REDACTED]";

impl SageConfig {
    /// Renders the effective configuration as TOML with the API key masked.
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        let mut shown = self.clone();
        if shown.llm.api_key.is_some() {
            shown.llm.api_key = Some(REDACTED.to_string());
        }
        toml::to_string_pretty(&shown)
    }
}

/// Process-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// LLM gateway configuration.
///
/// Passed to the gateway at construction time; there is no process-wide
/// provider state.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LlmConfig {
    /// API key. `None` falls back to the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model used for report generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens to generate per response.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Anthropic API version header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// HTTP timeout for a single model call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Transport-level retries on transient HTTP statuses.
    #[serde(default)]
    pub max_retries: u32,

    /// Ask the model for schema-conforming output instead of free text.
    #[serde(default = "default_structured_output")]
    pub structured_output: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            max_retries: 0,
            structured_output: default_structured_output(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_structured_output() -> bool {
    true
}

/// Data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DataSourceConfig {
    /// Name of the data source whose schema is offered to the model.
    #[serde(default = "default_data_source_name")]
    pub name: String,

    /// Database adapter identifier, used to pick the SQL dialect.
    #[serde(default = "default_adapter")]
    pub adapter: String,

    /// Path to a SQLite database to introspect. `None` disables schema context.
    #[serde(default)]
    pub database_path: Option<String>,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            name: default_data_source_name(),
            adapter: default_adapter(),
            database_path: None,
        }
    }
}

fn default_data_source_name() -> String {
    "main".to_string()
}

fn default_adapter() -> String {
    "sqlite".to_string()
}

/// Prompt composition configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PromptConfig {
    /// Operator text placed ahead of the base instructions.
    #[serde(default)]
    pub extra_instructions: Option<String>,

    /// Model name prefixes excluded from the scope reference section.
    #[serde(default = "default_excluded_namespaces")]
    pub excluded_namespaces: Vec<String>,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            extra_instructions: None,
            excluded_namespaces: default_excluded_namespaces(),
        }
    }
}

fn default_excluded_namespaces() -> Vec<String> {
    vec!["Sage::".to_string(), "Blazer::".to_string()]
}
