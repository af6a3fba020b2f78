// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock data source and model registry for context-builder tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use sage_core::traits::{DataSource, ModelRegistry, PluginAdapter};
use sage_core::types::{HealthStatus, ModelDescriptor, SchemaInfo};
use sage_core::SageError;

/// What a [`MockDataSource`] answers from `schema()`.
enum Behavior {
    Schema(Option<SchemaInfo>),
    Error(String),
}

/// A data source that returns a fixed schema, no schema, or an error.
pub struct MockDataSource {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockDataSource {
    /// A data source describing the given schema.
    pub fn with_schema(schema: SchemaInfo) -> Self {
        Self::new(Behavior::Schema(Some(schema)))
    }

    /// A data source that does not support introspection.
    pub fn without_schema() -> Self {
        Self::new(Behavior::Schema(None))
    }

    /// A data source whose introspection fails.
    pub fn failing(message: &str) -> Self {
        Self::new(Behavior::Error(message.to_string()))
    }

    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `schema()` calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockDataSource {
    fn name(&self) -> &str {
        "mock-data-source"
    }

    async fn health_check(&self) -> Result<HealthStatus, SageError> {
        match &self.behavior {
            Behavior::Schema(_) => Ok(HealthStatus::Healthy),
            Behavior::Error(message) => Ok(HealthStatus::Unhealthy(message.clone())),
        }
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn schema(&self) -> Result<Option<SchemaInfo>, SageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Schema(schema) => Ok(schema.clone()),
            Behavior::Error(message) => Err(SageError::data_source(message.clone())),
        }
    }
}

/// A model registry that always fails to enumerate.
pub struct FailingModelRegistry;

impl ModelRegistry for FailingModelRegistry {
    fn models(&self) -> Result<Vec<ModelDescriptor>, SageError> {
        Err(SageError::Registry {
            message: "catalog unavailable".to_string(),
        })
    }
}
