// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! LLM gateway trait for model provider integrations.

use async_trait::async_trait;

use crate::error::SageError;
use crate::types::{GatewayRequest, GatewayResponse};

/// A single abstracted call to a language model.
///
/// Implementations take their provider, model, and credentials at
/// construction time. Failures are returned as-is; retry policy belongs
/// to the transport or the caller.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Sends instructions, an optional structured-output schema, and the
    /// user message, and returns the model's raw reply.
    async fn ask(&self, request: GatewayRequest) -> Result<GatewayResponse, SageError>;
}
