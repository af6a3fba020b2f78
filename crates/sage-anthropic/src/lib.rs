// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude gateway adapter for Sage.
//!
//! This crate implements [`LlmGateway`] over the Anthropic Messages API.
//! Structured output is obtained by declaring the response schema as a
//! single tool and forcing the model to call it.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use sage_config::model::LlmConfig;
use sage_core::error::SageError;
use sage_core::traits::LlmGateway;
use sage_core::types::{GatewayRequest, GatewayResponse, TokenUsage};
use tracing::{debug, info};

use crate::client::AnthropicClient;
use crate::types::{
    ApiMessage, MessageRequest, MessageResponse, ResponseContentBlock, ToolChoice, ToolDefinition,
};

/// Anthropic Claude gateway implementing [`LlmGateway`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicGateway {
    client: AnthropicClient,
    model: String,
    max_tokens: u32,
}

impl AnthropicGateway {
    /// Creates a gateway from the `[llm]` configuration section.
    pub fn new(config: &LlmConfig) -> Result<Self, SageError> {
        let api_key = resolve_api_key(config.api_key.as_deref())?;
        let client = AnthropicClient::new(
            &api_key,
            &config.api_version,
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
        )?;

        info!(model = %config.model, "Anthropic gateway initialized");
        Ok(Self::with_client(client, config))
    }

    /// Creates a gateway with an existing client.
    pub fn with_client(client: AnthropicClient, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }

    /// Converts a [`GatewayRequest`] to an Anthropic [`MessageRequest`].
    fn to_message_request(&self, request: &GatewayRequest) -> MessageRequest {
        let (tools, tool_choice) = match &request.schema {
            Some(schema) => (
                Some(vec![ToolDefinition {
                    name: schema.name.clone(),
                    description: schema.description.clone(),
                    input_schema: schema.to_json_schema(),
                }]),
                Some(ToolChoice::tool(schema.name.clone())),
            ),
            None => (None, None),
        };

        MessageRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage::user(request.message.clone())],
            system: Some(request.instructions.clone()),
            max_tokens: self.max_tokens,
            tools,
            tool_choice,
        }
    }
}

#[async_trait]
impl LlmGateway for AnthropicGateway {
    async fn ask(&self, request: GatewayRequest) -> Result<GatewayResponse, SageError> {
        let api_request = self.to_message_request(&request);
        let tool_name = request.schema.as_ref().map(|s| s.name.as_str());
        let response = self.client.complete_message(&api_request).await?;

        debug!(
            id = %response.id,
            stop_reason = response.stop_reason.as_deref().unwrap_or("none"),
            blocks = response.content.len(),
            "Anthropic response received"
        );

        Ok(GatewayResponse {
            content: response_content(&response, tool_name),
            model: response.model.clone(),
            usage: Some(TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            }),
        })
    }
}

/// Extracts the reply content.
///
/// A call to the requested tool yields its input as a JSON object; any
/// other reply yields its concatenated text as a JSON string.
fn response_content(response: &MessageResponse, tool_name: Option<&str>) -> serde_json::Value {
    if let Some(tool_name) = tool_name {
        let tool_input = response.content.iter().find_map(|block| match block {
            ResponseContentBlock::ToolUse { name, input, .. } if name == tool_name => {
                Some(input.clone())
            }
            _ => None,
        });
        if let Some(input) = tool_input {
            return input;
        }
    }

    let text = response
        .content
        .iter()
        .filter_map(|block| match block {
            ResponseContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("");
    serde_json::Value::String(text)
}

/// Resolves the API key from config or environment.
fn resolve_api_key(config_key: Option<&str>) -> Result<String, SageError> {
    if let Some(key) = config_key
        && !key.is_empty()
    {
        return Ok(key.to_string());
    }

    std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
        SageError::Config(
            "Anthropic API key not found. Set llm.api_key in config or ANTHROPIC_API_KEY environment variable.".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_core::types::{ResponseSchema, SchemaProperty};

    fn gateway() -> AnthropicGateway {
        let config = LlmConfig {
            max_tokens: 2048,
            ..LlmConfig::default()
        };
        let client = AnthropicClient::new("test-key", "2023-06-01", Duration::from_secs(5), 0).unwrap();
        AnthropicGateway::with_client(client, &config)
    }

    fn schema() -> ResponseSchema {
        ResponseSchema {
            name: "report_response".into(),
            description: "report".into(),
            properties: vec![SchemaProperty {
                name: "sql".into(),
                description: "the sql".into(),
            }],
        }
    }

    fn response(content: Vec<ResponseContentBlock>) -> MessageResponse {
        MessageResponse {
            id: "msg".into(),
            content,
            model: "claude-sonnet-4-20250514".into(),
            stop_reason: None,
            usage: Default::default(),
        }
    }

    #[test]
    fn resolve_api_key_from_config() {
        assert_eq!(resolve_api_key(Some("sk-test-123")).unwrap(), "sk-test-123");
    }

    #[test]
    fn resolve_api_key_empty_config_falls_back_to_env() {
        // Succeeds only when ANTHROPIC_API_KEY is set; never returns "".
        if let Ok(key) = resolve_api_key(Some("")) {
            assert!(!key.is_empty());
        }
    }

    #[test]
    fn resolve_api_key_none_reports_config_error() {
        if let Err(err) = resolve_api_key(None) {
            assert!(matches!(err, SageError::Config(_)));
            assert!(err.to_string().contains("API key not found"));
        }
    }

    #[test]
    fn schema_becomes_forced_tool() {
        let req = gateway().to_message_request(&GatewayRequest {
            instructions: "sys".into(),
            schema: Some(schema()),
            message: "count users".into(),
        });

        assert_eq!(req.max_tokens, 2048);
        assert_eq!(req.system.as_deref(), Some("sys"));
        assert_eq!(req.messages[0].content, "count users");
        let tools = req.tools.unwrap();
        assert_eq!(tools[0].name, "report_response");
        assert_eq!(tools[0].input_schema["required"], serde_json::json!(["sql"]));
        assert_eq!(req.tool_choice.unwrap().name, "report_response");
    }

    #[test]
    fn no_schema_means_no_tools() {
        let req = gateway().to_message_request(&GatewayRequest {
            instructions: "sys".into(),
            schema: None,
            message: "hi".into(),
        });
        assert!(req.tools.is_none());
        assert!(req.tool_choice.is_none());
    }

    #[test]
    fn tool_input_becomes_mapping_content() {
        let content = response_content(
            &response(vec![ResponseContentBlock::ToolUse {
                id: "tu".into(),
                name: "report_response".into(),
                input: serde_json::json!({"sql": "SELECT 1", "summary": "one"}),
            }]),
            Some("report_response"),
        );
        assert_eq!(content["sql"], "SELECT 1");
    }

    #[test]
    fn text_blocks_become_string_content() {
        let content = response_content(
            &response(vec![
                ResponseContentBlock::Text { text: "{\"sql\": ".into() },
                ResponseContentBlock::Other,
                ResponseContentBlock::Text { text: "\"SELECT 1\"}".into() },
            ]),
            Some("report_response"),
        );
        assert_eq!(content, serde_json::json!("{\"sql\": \"SELECT 1\"}"));
    }
}
