// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM gateway for deterministic testing.
//!
//! `MockGateway` implements `LlmGateway` with pre-configured replies and
//! captures every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sage_core::traits::LlmGateway;
use sage_core::types::{GatewayRequest, GatewayResponse, TokenUsage};
use sage_core::SageError;

/// A queued reply: raw content, or a gateway error message.
type Reply = Result<serde_json::Value, String>;

/// A mock gateway that returns pre-configured replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty, a
/// structured reply with a fixed summary and no SQL is returned.
pub struct MockGateway {
    replies: Arc<Mutex<VecDeque<Reply>>>,
    requests: Arc<Mutex<Vec<GatewayRequest>>>,
}

impl MockGateway {
    /// Create a new mock gateway with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a gateway that answers once with a structured mapping.
    pub fn structured(summary: &str, sql: Option<&str>) -> Self {
        Self::with_replies(vec![Ok(serde_json::json!({"summary": summary, "sql": sql}))])
    }

    /// Create a gateway that answers once with free text.
    pub fn text(content: &str) -> Self {
        Self::with_replies(vec![Ok(serde_json::Value::String(content.to_string()))])
    }

    /// Create a gateway whose next call fails with a gateway error.
    pub fn failing(message: &str) -> Self {
        Self::with_replies(vec![Err(message.to_string())])
    }

    /// Create a mock gateway pre-loaded with the given replies.
    pub fn with_replies(replies: Vec<Reply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::from(replies))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn push_reply(&self, reply: Reply) {
        self.replies.lock().await.push_back(reply);
    }

    /// All requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<GatewayRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of calls made to `ask`.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmGateway for MockGateway {
    async fn ask(&self, request: GatewayRequest) -> Result<GatewayResponse, SageError> {
        self.requests.lock().await.push(request);

        let reply = self.replies.lock().await.pop_front().unwrap_or_else(|| {
            Ok(serde_json::json!({"summary": "mock response", "sql": null}))
        });

        match reply {
            Ok(content) => Ok(GatewayResponse {
                content,
                model: "mock-model".to_string(),
                usage: Some(TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                }),
            }),
            Err(message) => Err(SageError::gateway(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(message: &str) -> GatewayRequest {
        GatewayRequest {
            instructions: "be helpful".into(),
            schema: None,
            message: message.into(),
        }
    }

    #[tokio::test]
    async fn default_reply_when_queue_empty() {
        let gateway = MockGateway::new();
        let resp = gateway.ask(request("hi")).await.unwrap();
        assert_eq!(resp.content["summary"], "mock response");
        assert!(resp.content["sql"].is_null());
    }

    #[tokio::test]
    async fn queued_replies_returned_in_order() {
        let gateway = MockGateway::with_replies(vec![
            Ok(serde_json::json!("first")),
            Err("boom".into()),
        ]);

        let first = gateway.ask(request("a")).await.unwrap();
        assert_eq!(first.content, "first");

        let second = gateway.ask(request("b")).await.unwrap_err();
        assert!(matches!(second, SageError::Gateway { .. }));
    }

    #[tokio::test]
    async fn requests_are_captured() {
        let gateway = MockGateway::structured("ok", Some("SELECT 1"));
        gateway.ask(request("count users")).await.unwrap();

        let requests = gateway.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].message, "count users");
    }
}
