// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result consumer trait: persistence and live notification of replies.

use async_trait::async_trait;

use crate::error::SageError;
use crate::types::{GenerationResult, Message, QueryId};

/// Receives the lifecycle of one report generation.
///
/// The consumer owns persistence of the reply message and any live UI
/// updates keyed by `stream_target_id`.
#[async_trait]
pub trait ResultConsumer: Send + Sync {
    /// Generation for `query_id` has started; show a placeholder.
    async fn started(&self, query_id: &QueryId, stream_target_id: &str) -> Result<(), SageError>;

    /// Generation finished. `message` is the new assistant turn to append;
    /// `result.sql`, when present, should be offered for execution or editing.
    async fn deliver(
        &self,
        query_id: &QueryId,
        stream_target_id: &str,
        message: &Message,
        result: &GenerationResult,
    ) -> Result<(), SageError>;

    /// Generation failed before a reply could be produced.
    async fn failed(
        &self,
        query_id: &QueryId,
        stream_target_id: &str,
        error: &SageError,
    ) -> Result<(), SageError>;
}
