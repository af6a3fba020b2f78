// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for the collaborators the pipeline consumes and feeds.
//!
//! Adapters extend the [`PluginAdapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod consumer;
pub mod data_source;
pub mod gateway;
pub mod registry;

pub use adapter::PluginAdapter;
pub use consumer::ResultConsumer;
pub use data_source::{DataSource, DataSourceRegistry};
pub use gateway::LlmGateway;
pub use registry::{ModelRegistry, StaticModelRegistry};
