// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Data source traits for schema introspection.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SageError;
use crate::traits::adapter::PluginAdapter;
use crate::types::SchemaInfo;

/// A queryable database connection that can describe its schema.
#[async_trait]
pub trait DataSource: PluginAdapter {
    /// Returns the schema of this data source.
    ///
    /// `Ok(None)` means the data source does not support introspection.
    async fn schema(&self) -> Result<Option<SchemaInfo>, SageError>;
}

/// Lookup of configured data sources by name.
pub trait DataSourceRegistry: Send + Sync {
    /// Returns the data source registered under `name`, if any.
    fn get(&self, name: &str) -> Option<Arc<dyn DataSource>>;
}

impl DataSourceRegistry for std::collections::HashMap<String, Arc<dyn DataSource>> {
    fn get(&self, name: &str) -> Option<Arc<dyn DataSource>> {
        std::collections::HashMap::get(self, name).cloned()
    }
}
