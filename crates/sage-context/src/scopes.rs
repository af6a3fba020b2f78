// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scope context: renders the host application's registered model scopes
//! as a reference of common query patterns.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use sage_core::traits::ModelRegistry;
use sage_core::types::{ModelDescriptor, ScopeDescriptor, ScopeKind};
use tracing::{debug, warn};

const HEADER: &str = "\n\n## REFERENCE: COMMON QUERY PATTERNS\n";
const INTRO: &str =
    "These ActiveRecord scopes show common query patterns used in the application:";

/// Projection of the statement's leading `SELECT`, up to its first `FROM`.
/// Only the start of the statement is anchored; the projection may span lines.
static PROJECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A(\s*)SELECT\s+.*?\s+FROM\b").expect("projection pattern is valid")
});

/// Builds the scope reference section from a model registry.
#[derive(Clone)]
pub struct ScopeContextBuilder {
    registry: Arc<dyn ModelRegistry>,
    excluded_namespaces: Vec<String>,
}

impl ScopeContextBuilder {
    /// Creates a builder that skips models whose names start with any of
    /// `excluded_namespaces`.
    pub fn new(registry: Arc<dyn ModelRegistry>, excluded_namespaces: Vec<String>) -> Self {
        Self {
            registry,
            excluded_namespaces,
        }
    }

    /// Returns the rendered scope section, or `None` when no eligible model
    /// declares a scope or the registry cannot be read.
    pub fn build(&self) -> Option<String> {
        let models = match self.registry.models() {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "could not enumerate registered models");
                return None;
            }
        };

        let eligible: Vec<&ModelDescriptor> = models
            .iter()
            .filter(|m| self.is_eligible(m))
            .filter(|m| !m.scopes.is_empty())
            .collect();

        if eligible.is_empty() {
            debug!(registered = models.len(), "no models with scopes");
            return None;
        }

        let mut parts = vec![HEADER.to_string(), INTRO.to_string()];
        for model in &eligible {
            parts.push(format!("\n### {} (table: `{}`)", model.name, model.table));
            for scope in &model.scopes {
                parts.push(format!("- {}", render_scope(scope)));
            }
        }

        debug!(models = eligible.len(), "built scope context");
        Some(parts.join("\n"))
    }

    fn is_eligible(&self, model: &ModelDescriptor) -> bool {
        if model.is_abstract {
            return false;
        }
        !self
            .excluded_namespaces
            .iter()
            .any(|ns| model.name.starts_with(ns.as_str()))
    }
}

/// Renders one scope line (without the list marker).
pub fn render_scope(scope: &ScopeDescriptor) -> String {
    match &scope.kind {
        ScopeKind::Static { sql: Some(sql) } => {
            format!("{}: {}", scope.name, normalize_scope_sql(sql))
        }
        ScopeKind::Static { sql: None } => scope.name.clone(),
        ScopeKind::Parameterized => format!("{} (parameterized)", scope.name),
    }
}

/// Flattens a leading `SELECT <columns> FROM` to `SELECT * FROM`.
pub fn normalize_scope_sql(sql: &str) -> String {
    PROJECTION.replace(sql, "${1}SELECT * FROM").into_owned()
}
