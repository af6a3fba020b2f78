// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report job: runs one generation and hands the reply to a consumer.

use std::sync::Arc;

use chrono::Utc;
use sage_core::traits::ResultConsumer;
use sage_core::types::{GenerationResult, Message, Query};
use sage_core::SageError;
use tracing::{info, warn};

use crate::processor::ReportProcessor;

/// Runs the processor for a submitted prompt and delivers the outcome.
///
/// Lifecycle:
/// 1. `started` so the consumer can show a placeholder
/// 2. generation
/// 3. `deliver` with the new assistant message, or `failed` on a
///    gateway error
///
/// Retries are left to whatever schedules the job.
#[derive(Clone)]
pub struct ReportJob {
    processor: Arc<ReportProcessor>,
    consumer: Arc<dyn ResultConsumer>,
}

impl ReportJob {
    pub fn new(processor: Arc<ReportProcessor>, consumer: Arc<dyn ResultConsumer>) -> Self {
        Self {
            processor,
            consumer,
        }
    }

    /// Generates a reply for `prompt` and delivers it under `stream_target_id`.
    ///
    /// Returns the generation result once the consumer accepted it. A
    /// gateway error is reported to the consumer and then returned.
    pub async fn perform(
        &self,
        query: &Query,
        prompt: &str,
        stream_target_id: &str,
    ) -> Result<GenerationResult, SageError> {
        self.consumer.started(&query.id, stream_target_id).await?;

        let result = match self.processor.process(query, prompt).await {
            Ok(result) => result,
            Err(e) => {
                warn!(query_id = %query.id, error = %e, "report generation failed");
                if let Err(notify_err) = self.consumer.failed(&query.id, stream_target_id, &e).await {
                    warn!(
                        query_id = %query.id,
                        error = %notify_err,
                        "could not report generation failure"
                    );
                }
                return Err(e);
            }
        };

        let message = Message {
            body: result.summary.clone(),
            statement: result.sql.clone(),
            creator: None,
            created_at: Utc::now(),
        };
        self.consumer
            .deliver(&query.id, stream_target_id, &message, &result)
            .await?;

        info!(
            query_id = %query.id,
            stream_target_id,
            has_sql = result.sql.is_some(),
            "report delivered"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_context::PromptComposer;
    use sage_test_utils::{ConsumerEvent, MockGateway, RecordingConsumer};

    fn job(gateway: MockGateway, consumer: Arc<RecordingConsumer>) -> ReportJob {
        let processor = ReportProcessor::new(Arc::new(gateway), PromptComposer::new("SQLite3"));
        ReportJob::new(Arc::new(processor), consumer)
    }

    #[tokio::test]
    async fn success_delivers_one_assistant_message() {
        let consumer = Arc::new(RecordingConsumer::new());
        let result = job(
            MockGateway::structured("Paid orders", Some("SELECT * FROM orders WHERE paid")),
            consumer.clone(),
        )
        .perform(&Query::new("9"), "paid orders", "stream-1")
        .await
        .unwrap();

        let events = consumer.events().await;
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            ConsumerEvent::Started { stream_target_id, .. } if stream_target_id == "stream-1"
        ));

        let messages = consumer.delivered_messages().await;
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].body, "Paid orders");
        assert_eq!(messages[0].statement, result.sql);
        assert!(messages[0].creator.is_none());
    }

    #[tokio::test]
    async fn gateway_failure_creates_no_message() {
        let consumer = Arc::new(RecordingConsumer::new());
        let err = job(MockGateway::failing("timeout"), consumer.clone())
            .perform(&Query::new("9"), "x", "stream-2")
            .await
            .unwrap_err();

        assert!(matches!(err, SageError::Gateway { .. }));
        assert!(consumer.delivered_messages().await.is_empty());
        assert!(matches!(
            consumer.events().await.last(),
            Some(ConsumerEvent::Failed { error, .. }) if error.contains("timeout")
        ));
    }

    #[tokio::test]
    async fn parse_failure_still_delivers_a_message() {
        let consumer = Arc::new(RecordingConsumer::new());
        let result = job(MockGateway::text("no json here"), consumer.clone())
            .perform(&Query::new("9"), "x", "stream-3")
            .await
            .unwrap();

        assert_eq!(result.summary, crate::parser::PARSE_FAILED_SUMMARY);
        assert_eq!(consumer.delivered_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn consumer_error_propagates() {
        let consumer = Arc::new(RecordingConsumer::failing_delivery());
        let err = job(MockGateway::structured("ok", None), consumer)
            .perform(&Query::new("9"), "x", "stream-4")
            .await
            .unwrap_err();
        assert!(matches!(err, SageError::Consumer { .. }));
    }
}
