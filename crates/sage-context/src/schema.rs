// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database schema context: renders a data source's tables and columns
//! into the prompt's DATABASE SCHEMA section.

use std::sync::Arc;

use sage_core::traits::DataSourceRegistry;
use sage_core::types::{SchemaInfo, TableSchema};
use tracing::{debug, warn};

/// Namespace shown for tables that do not report one.
pub const DEFAULT_NAMESPACE: &str = "public";

const HEADER: &str = "\n\n## DATABASE SCHEMA\n";
const INTRO: &str =
    "Available tables and their columns (use these exact names in your queries):\n";

/// Builds the schema section for one named data source.
#[derive(Clone)]
pub struct SchemaContextBuilder {
    registry: Arc<dyn DataSourceRegistry>,
    data_source_name: String,
}

impl SchemaContextBuilder {
    pub fn new(registry: Arc<dyn DataSourceRegistry>, data_source_name: impl Into<String>) -> Self {
        Self {
            registry,
            data_source_name: data_source_name.into(),
        }
    }

    /// Name of the data source this builder reads.
    pub fn data_source_name(&self) -> &str {
        &self.data_source_name
    }

    /// Returns the rendered schema section, or `None` when no schema is
    /// available.
    ///
    /// Unknown data sources, sources without introspection, lookup errors
    /// and empty listings all yield `None`. Errors are logged and never
    /// propagated.
    pub async fn build(&self) -> Option<String> {
        let Some(source) = self.registry.get(&self.data_source_name) else {
            debug!(data_source = %self.data_source_name, "data source not registered");
            return None;
        };

        match source.schema().await {
            Ok(Some(info)) => render_schema(&info),
            Ok(None) => {
                debug!(data_source = %self.data_source_name, "data source has no schema");
                None
            }
            Err(e) => {
                warn!(
                    data_source = %self.data_source_name,
                    error = %e,
                    "could not load database schema"
                );
                None
            }
        }
    }
}

/// Renders schema metadata into the DATABASE SCHEMA section.
///
/// Structured listings produce one block per table in the order given;
/// raw descriptions are fenced verbatim. Returns `None` for an empty
/// structured listing.
pub fn render_schema(info: &SchemaInfo) -> Option<String> {
    let mut parts: Vec<String> = vec![HEADER.to_string(), INTRO.to_string()];

    match info {
        SchemaInfo::Tables(tables) => {
            if tables.is_empty() {
                return None;
            }
            for table in tables {
                render_table(table, &mut parts);
            }
        }
        SchemaInfo::Raw(text) => {
            parts.push("```".to_string());
            parts.push(text.clone());
            parts.push("```".to_string());
        }
    }

    Some(parts.join("\n"))
}

fn render_table(table: &TableSchema, parts: &mut Vec<String>) {
    let namespace = table.schema.as_deref().unwrap_or(DEFAULT_NAMESPACE);
    parts.push(format!("\n### Table: `{namespace}.{}`", table.table));
    parts.push("Columns:".to_string());
    for column in &table.columns {
        parts.push(format!("  - `{}` ({})", column.name, column.data_type));
    }
}
