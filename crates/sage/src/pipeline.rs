// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wires configuration, data source, catalog, and gateway into a pipeline.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use sage_anthropic::AnthropicGateway;
use sage_config::SageConfig;
use sage_context::ComposedPrompt;
use sage_core::traits::{DataSource, StaticModelRegistry};
use sage_core::types::{GenerationResult, Query};
use sage_core::SageError;
use sage_report::{ReportContext, ReportProcessor};
use sage_storage::SqliteDataSource;
use tracing::{debug, info};

/// Identifier given to the ad-hoc query a CLI invocation works on.
const CLI_QUERY_ID: &str = "cli";

/// The prompt context and settings a single CLI invocation needs.
///
/// `prompt` and `ask` share one [`ReportContext`], so the preview is the
/// request that would be sent.
pub struct Pipeline {
    config: SageConfig,
    context: ReportContext,
}

impl Pipeline {
    /// Opens the configured data source and loads the optional model catalog.
    pub async fn open(config: SageConfig, catalog: Option<&Path>) -> Result<Self, SageError> {
        let mut sources: HashMap<String, Arc<dyn DataSource>> = HashMap::new();
        if let Some(path) = config.data_source.database_path.as_deref() {
            let source = open_data_source(&config.data_source.name, path).await?;
            sources.insert(config.data_source.name.clone(), Arc::new(source));
        } else {
            debug!("no database_path configured, schema context disabled");
        }

        let models = match catalog {
            Some(path) => load_catalog(path)?,
            None => StaticModelRegistry::default(),
        };

        let context = ReportContext::from_config(&config, Arc::new(sources), Arc::new(models));
        Ok(Self { config, context })
    }

    /// Composes the instructions and user message without calling the model.
    pub async fn preview(&self, query: &Query, prompt: &str) -> ComposedPrompt {
        self.context.compose(query, prompt).await
    }

    /// Runs one report generation against the Anthropic gateway.
    pub async fn ask(self, query: &Query, prompt: &str) -> Result<GenerationResult, SageError> {
        let gateway = AnthropicGateway::new(&self.config.llm)?;
        let processor = ReportProcessor::with_context(Arc::new(gateway), self.context)
            .with_structured_output(self.config.llm.structured_output);
        processor.process(query, prompt).await
    }
}

/// Opens the SQLite file at `path`, refusing paths that do not exist.
pub async fn open_data_source(name: &str, path: &str) -> Result<SqliteDataSource, SageError> {
    if !Path::new(path).exists() {
        return Err(SageError::Config(format!(
            "data_source.database_path does not exist: {path}"
        )));
    }
    let source = SqliteDataSource::open(name, path).await?;
    info!(name, path, "opened data source");
    Ok(source)
}

/// Builds the query a CLI invocation operates on.
pub fn cli_query(statement: Option<String>) -> Query {
    let mut query = Query::new(CLI_QUERY_ID);
    query.statement = statement.filter(|s| !s.trim().is_empty());
    query
}

/// Reads a JSON model catalog from disk.
pub fn load_catalog(path: &Path) -> Result<StaticModelRegistry, SageError> {
    let json = std::fs::read_to_string(path).map_err(|e| SageError::Registry {
        message: format!("failed to read model catalog {}: {e}", path.display()),
    })?;
    let registry = StaticModelRegistry::from_json(&json)?;
    info!(path = %path.display(), models = registry.len(), "loaded model catalog");
    Ok(registry)
}
