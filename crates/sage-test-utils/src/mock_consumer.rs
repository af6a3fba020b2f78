// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result consumer that records every callback for assertion in tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use sage_core::traits::ResultConsumer;
use sage_core::types::{GenerationResult, Message, QueryId};
use sage_core::SageError;

/// One recorded consumer callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsumerEvent {
    Started {
        query_id: QueryId,
        stream_target_id: String,
    },
    Delivered {
        query_id: QueryId,
        stream_target_id: String,
        message: Message,
        result: GenerationResult,
    },
    Failed {
        query_id: QueryId,
        stream_target_id: String,
        error: String,
    },
}

/// Records callbacks in order. `deliver` can be made to fail to exercise
/// consumer error handling.
#[derive(Default)]
pub struct RecordingConsumer {
    events: Arc<Mutex<Vec<ConsumerEvent>>>,
    fail_delivery: bool,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A consumer whose `deliver` always returns a consumer error.
    pub fn failing_delivery() -> Self {
        Self {
            events: Arc::default(),
            fail_delivery: true,
        }
    }

    /// All recorded events, oldest first.
    pub async fn events(&self) -> Vec<ConsumerEvent> {
        self.events.lock().await.clone()
    }

    /// Messages handed over by `deliver`.
    pub async fn delivered_messages(&self) -> Vec<Message> {
        self.events
            .lock()
            .await
            .iter()
            .filter_map(|e| match e {
                ConsumerEvent::Delivered { message, .. } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl ResultConsumer for RecordingConsumer {
    async fn started(&self, query_id: &QueryId, stream_target_id: &str) -> Result<(), SageError> {
        self.events.lock().await.push(ConsumerEvent::Started {
            query_id: query_id.clone(),
            stream_target_id: stream_target_id.to_string(),
        });
        Ok(())
    }

    async fn deliver(
        &self,
        query_id: &QueryId,
        stream_target_id: &str,
        message: &Message,
        result: &GenerationResult,
    ) -> Result<(), SageError> {
        if self.fail_delivery {
            return Err(SageError::Consumer {
                message: "could not persist message".to_string(),
                source: None,
            });
        }
        self.events.lock().await.push(ConsumerEvent::Delivered {
            query_id: query_id.clone(),
            stream_target_id: stream_target_id.to_string(),
            message: message.clone(),
            result: result.clone(),
        });
        Ok(())
    }

    async fn failed(
        &self,
        query_id: &QueryId,
        stream_target_id: &str,
        error: &SageError,
    ) -> Result<(), SageError> {
        self.events.lock().await.push(ConsumerEvent::Failed {
            query_id: query_id.clone(),
            stream_target_id: stream_target_id.to_string(),
            error: error.to_string(),
        });
        Ok(())
    }
}
