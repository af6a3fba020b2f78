// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report orchestration: one prompt in, one `{summary, sql}` result out.

use std::sync::Arc;

use sage_config::SageConfig;
use sage_context::PromptComposer;
use sage_core::traits::{DataSourceRegistry, LlmGateway, ModelRegistry};
use sage_core::types::{GatewayRequest, GenerationResult, Query};
use sage_core::SageError;
use tracing::info;

use crate::context::ReportContext;
use crate::parser::{ParsedResponse, parse_response};
use crate::schema::report_response_schema;

/// Summary returned when the model produced no usable summary.
pub const EMPTY_SUMMARY_FALLBACK: &str = "I couldn't generate a response. Please try again.";

/// Drives a single report generation: context, model call, parsing.
///
/// The processor neither persists nor broadcasts; see
/// [`ReportJob`](crate::job::ReportJob) for delivery.
pub struct ReportProcessor {
    gateway: Arc<dyn LlmGateway>,
    context: ReportContext,
    structured_output: bool,
}

impl ReportProcessor {
    /// Creates a processor with no schema or scope context.
    pub fn new(gateway: Arc<dyn LlmGateway>, composer: PromptComposer) -> Self {
        Self::with_context(gateway, ReportContext::new(composer))
    }

    /// Creates a processor around an existing prompt context.
    pub fn with_context(gateway: Arc<dyn LlmGateway>, context: ReportContext) -> Self {
        Self {
            gateway,
            context,
            structured_output: true,
        }
    }

    /// Wires a processor from configuration and the host's registries.
    pub fn from_config(
        config: &SageConfig,
        gateway: Arc<dyn LlmGateway>,
        data_sources: Arc<dyn DataSourceRegistry>,
        models: Arc<dyn ModelRegistry>,
    ) -> Self {
        Self::with_context(gateway, ReportContext::from_config(config, data_sources, models))
            .with_structured_output(config.llm.structured_output)
    }

    /// When disabled, the model is asked for free text and every reply
    /// goes through the text tiers of the parser.
    pub fn with_structured_output(mut self, enabled: bool) -> Self {
        self.structured_output = enabled;
        self
    }

    /// Returns the system instructions that `process` would send for `query`.
    pub async fn system_prompt(&self, query: &Query) -> String {
        self.context.system_prompt(query).await
    }

    /// Generates a report for `prompt` in the context of `query`.
    ///
    /// Calls the gateway exactly once. Gateway errors are returned
    /// unchanged; malformed replies are recovered by the parser.
    pub async fn process(&self, query: &Query, prompt: &str) -> Result<GenerationResult, SageError> {
        let composed = self.context.compose(query, prompt).await;
        info!(
            query_id = %query.id,
            instructions_len = composed.instructions.len(),
            dialect = self.context.dialect(),
            "sending report request"
        );

        let request = GatewayRequest {
            instructions: composed.instructions,
            schema: self.structured_output.then(report_response_schema),
            message: composed.message,
        };
        let response = self.gateway.ask(request).await?;
        info!(
            query_id = %query.id,
            model = %response.model,
            input_tokens = response.usage.as_ref().map(|u| u.input_tokens),
            output_tokens = response.usage.as_ref().map(|u| u.output_tokens),
            "received report response"
        );

        let parsed = parse_response(&response.content);
        info!(
            query_id = %query.id,
            tier = %parsed.tier,
            has_sql = parsed.sql.is_some(),
            "parsed report response"
        );

        Ok(finalize(parsed))
    }
}

/// Converts a parser result into the final result, substituting the
/// fallback summary for an absent or blank one.
pub fn finalize(parsed: ParsedResponse) -> GenerationResult {
    let summary = parsed
        .summary
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| EMPTY_SUMMARY_FALLBACK.to_string());

    GenerationResult {
        summary,
        sql: parsed.sql,
    }
}
