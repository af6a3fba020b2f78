// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt context for a report request: composer plus the schema and scope
//! builders it pulls from.

use std::sync::Arc;

use sage_config::SageConfig;
use sage_context::{ComposedPrompt, PromptComposer, ScopeContextBuilder, SchemaContextBuilder};
use sage_core::traits::{DataSourceRegistry, ModelRegistry};
use sage_core::types::Query;
use tracing::debug;

/// Everything needed to build the prompt for a report, without a model.
///
/// [`ReportProcessor`](crate::processor::ReportProcessor) sends exactly what
/// this produces, so previews and real requests cannot diverge.
pub struct ReportContext {
    composer: PromptComposer,
    schema_context: Option<SchemaContextBuilder>,
    scope_context: Option<ScopeContextBuilder>,
}

impl ReportContext {
    /// A context with no schema or scope sections.
    pub fn new(composer: PromptComposer) -> Self {
        Self {
            composer,
            schema_context: None,
            scope_context: None,
        }
    }

    /// Wires a context from configuration and the host's registries.
    pub fn from_config(
        config: &SageConfig,
        data_sources: Arc<dyn DataSourceRegistry>,
        models: Arc<dyn ModelRegistry>,
    ) -> Self {
        Self::new(PromptComposer::from_config(config))
            .with_schema_context(SchemaContextBuilder::new(
                data_sources,
                config.data_source.name.clone(),
            ))
            .with_scope_context(ScopeContextBuilder::new(
                models,
                config.prompt.excluded_namespaces.clone(),
            ))
    }

    pub fn with_schema_context(mut self, builder: SchemaContextBuilder) -> Self {
        self.schema_context = Some(builder);
        self
    }

    pub fn with_scope_context(mut self, builder: ScopeContextBuilder) -> Self {
        self.scope_context = Some(builder);
        self
    }

    pub fn dialect(&self) -> &str {
        self.composer.dialect()
    }

    /// Returns the system instructions for `query`.
    pub async fn system_prompt(&self, query: &Query) -> String {
        let schema = match &self.schema_context {
            Some(builder) => builder.build().await,
            None => None,
        };
        let scopes = self.scope_context.as_ref().and_then(ScopeContextBuilder::build);

        debug!(
            query_id = %query.id,
            has_schema = schema.is_some(),
            has_scopes = scopes.is_some(),
            "assembled prompt context"
        );
        self.composer
            .instructions(query, schema.as_deref(), scopes.as_deref())
    }

    /// Returns the user message for `prompt`.
    pub fn message(&self, prompt: &str) -> String {
        self.composer.message(prompt)
    }

    /// Builds the instructions and the user message together.
    pub async fn compose(&self, query: &Query, prompt: &str) -> ComposedPrompt {
        ComposedPrompt {
            instructions: self.system_prompt(query).await,
            message: self.message(prompt),
        }
    }
}
