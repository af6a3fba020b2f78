// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.

use crate::diagnostic::ConfigError;
use crate::model::SageConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every validation error instead of failing fast.
pub fn validate_config(config: &SageConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        fail(format!(
            "agent.log_level `{}` must be one of: {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.llm.model.trim().is_empty() {
        fail("llm.model must not be empty".to_string());
    }

    if config.llm.max_tokens == 0 {
        fail("llm.max_tokens must be greater than zero".to_string());
    }

    if config.llm.timeout_secs == 0 {
        fail("llm.timeout_secs must be greater than zero".to_string());
    }

    if config.data_source.name.trim().is_empty() {
        fail("data_source.name must not be empty".to_string());
    }

    if config.data_source.adapter.trim().is_empty() {
        fail("data_source.adapter must not be empty".to_string());
    }

    if let Some(path) = &config.data_source.database_path
        && path.trim().is_empty()
    {
        fail("data_source.database_path must not be empty when set".to_string());
    }

    for (i, namespace) in config.prompt.excluded_namespaces.iter().enumerate() {
        if namespace.trim().is_empty() {
            fail(format!("prompt.excluded_namespaces[{i}] must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&SageConfig::default()).is_ok());
    }

    #[test]
    fn unknown_log_level_fails_validation() {
        let mut config = SageConfig::default();
        config.agent.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("agent.log_level"));
    }

    #[test]
    fn zero_max_tokens_fails_validation() {
        let mut config = SageConfig::default();
        config.llm.max_tokens = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("llm.max_tokens"));
    }

    #[test]
    fn blank_database_path_fails_validation() {
        let mut config = SageConfig::default();
        config.data_source.database_path = Some("  ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].to_string().contains("data_source.database_path"));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = SageConfig::default();
        config.llm.model = String::new();
        config.llm.timeout_secs = 0;
        config.data_source.name = String::new();
        config.prompt.excluded_namespaces = vec![String::new()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4, "should not fail fast: {errors:?}");
    }
}
