// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Sage integration tests.
//!
//! Provides mock adapters and fixtures for fast, deterministic tests
//! without a live model or database.
//!
//! # Components
//!
//! - [`MockGateway`] - LLM gateway with pre-configured replies and request capture
//! - [`MockDataSource`] - data source returning a fixed schema or error
//! - [`RecordingConsumer`] - result consumer that records every callback
//! - [`fixtures`] - sample schemas, models, and queries

pub mod fixtures;
pub mod mock_consumer;
pub mod mock_data_source;
pub mod mock_gateway;

pub use mock_consumer::{ConsumerEvent, RecordingConsumer};
pub use mock_data_source::{FailingModelRegistry, MockDataSource};
pub use mock_gateway::MockGateway;
