// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway tests against a mock Anthropic server.

use std::time::Duration;

use sage_anthropic::AnthropicGateway;
use sage_anthropic::client::AnthropicClient;
use sage_config::model::LlmConfig;
use sage_core::SageError;
use sage_core::traits::LlmGateway;
use sage_core::types::{GatewayRequest, ResponseSchema, SchemaProperty};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn gateway(server: &MockServer) -> AnthropicGateway {
    let config = LlmConfig::default();
    let client = AnthropicClient::new("test-key", &config.api_version, Duration::from_secs(5), 0)
        .unwrap()
        .with_base_url(server.uri());
    AnthropicGateway::with_client(client, &config)
}

fn report_request() -> GatewayRequest {
    GatewayRequest {
        instructions: "You are an expert SQL analyst".into(),
        schema: Some(ResponseSchema {
            name: "report_response".into(),
            description: "report".into(),
            properties: vec![
                SchemaProperty {
                    name: "sql".into(),
                    description: "Generated SQL based on user prompt".into(),
                },
                SchemaProperty {
                    name: "summary".into(),
                    description: "Natural language summary of generated report".into(),
                },
            ],
        }),
        message: "count users. Return as a JSON object".into(),
    }
}

#[tokio::test]
async fn forced_tool_call_yields_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(serde_json::json!({
            "system": "You are an expert SQL analyst",
            "tool_choice": {"type": "tool", "name": "report_response"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [{
                "type": "tool_use",
                "id": "tu_1",
                "name": "report_response",
                "input": {"sql": "SELECT COUNT(*) FROM users", "summary": "Counts users"}
            }],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "tool_use",
            "usage": {"input_tokens": 900, "output_tokens": 40}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = gateway(&server).ask(report_request()).await.unwrap();
    assert_eq!(response.content["summary"], "Counts users");
    assert_eq!(response.usage.unwrap().input_tokens, 900);
}

#[tokio::test]
async fn text_reply_yields_string() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "msg_2",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "{\"summary\": \"hi\", \"sql\": null}"}],
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 1, "output_tokens": 1}
        })))
        .mount(&server)
        .await;

    let response = gateway(&server).ask(report_request()).await.unwrap();
    assert_eq!(response.content, serde_json::json!("{\"summary\": \"hi\", \"sql\": null}"));
}

#[tokio::test]
async fn server_error_is_a_single_attempt_gateway_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway(&server).ask(report_request()).await.unwrap_err();
    assert!(matches!(err, SageError::Gateway { .. }), "got: {err:?}");
}
