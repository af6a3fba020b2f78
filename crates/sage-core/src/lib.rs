// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Sage report pipeline.
//!
//! This crate provides the trait definitions, error type, and common types
//! shared by the context builders, the report processor, and the adapters
//! (LLM gateway, data sources) that plug into them.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SageError;
pub use types::{
    ColumnSchema, GatewayRequest, GatewayResponse, GenerationResult, HealthStatus,
    Message, ModelDescriptor, Query, QueryId, ResponseSchema, SchemaInfo, SchemaProperty,
    ScopeDescriptor, ScopeKind, TableSchema, TokenUsage,
};

pub use traits::{
    DataSource, DataSourceRegistry, LlmGateway, ModelRegistry, PluginAdapter, ResultConsumer,
    StaticModelRegistry,
};
