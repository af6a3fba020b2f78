// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model registry trait: the host application's data-access models.

use serde::{Deserialize, Serialize};

use crate::error::SageError;
use crate::types::ModelDescriptor;

/// Enumerates the data-access models the host application registered.
///
/// Registration is explicit: the host supplies model names, tables, and
/// precomputed scope SQL at startup.
pub trait ModelRegistry: Send + Sync {
    /// Returns every registered model, in registration order.
    fn models(&self) -> Result<Vec<ModelDescriptor>, SageError>;
}

impl ModelRegistry for Vec<ModelDescriptor> {
    fn models(&self) -> Result<Vec<ModelDescriptor>, SageError> {
        Ok(self.clone())
    }
}

/// A fixed set of models registered once at startup.
///
/// Serializes as a bare JSON array of descriptors, which is the catalog
/// file format accepted by the CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticModelRegistry {
    models: Vec<ModelDescriptor>,
}

impl StaticModelRegistry {
    /// Parses a JSON catalog.
    pub fn from_json(json: &str) -> Result<Self, SageError> {
        serde_json::from_str(json).map_err(|e| SageError::Registry {
            message: format!("invalid model catalog: {e}"),
        })
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelRegistry for StaticModelRegistry {
    fn models(&self) -> Result<Vec<ModelDescriptor>, SageError> {
        Ok(self.models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScopeDescriptor;

    #[test]
    fn catalog_parses_from_json_array() {
        let json = r#"[
            {
                "name": "User",
                "table": "users",
                "scopes": [
                    {"name": "active", "kind": "static", "sql": "SELECT \"users\".* FROM \"users\" WHERE active = 1"},
                    {"name": "by_role", "kind": "parameterized"}
                ]
            },
            {"name": "ApplicationRecord", "table": "", "is_abstract": true}
        ]"#;

        let registry = StaticModelRegistry::from_json(json).unwrap();
        let models = registry.models().unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(models[0].name, "User");
        assert_eq!(models[0].scopes[1], ScopeDescriptor::parameterized("by_role"));
        assert!(models[1].is_abstract);
        assert!(models[1].scopes.is_empty());
    }

    #[test]
    fn malformed_catalog_is_a_registry_error() {
        let err = StaticModelRegistry::from_json(r#"{"name": "User"}"#).unwrap_err();
        assert!(matches!(err, SageError::Registry { .. }));
        assert!(err.to_string().starts_with("model registry error: invalid model catalog"));
    }

    #[test]
    fn empty_catalog_has_no_models() {
        let registry = StaticModelRegistry::from_json("[]").unwrap();
        assert!(registry.is_empty());
        assert!(registry.models().unwrap().is_empty());
    }
}
