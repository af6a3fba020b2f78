// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Sage pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a saved report query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryId(pub String);

impl std::fmt::Display for QueryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter works but cannot contribute to the prompt as configured.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => f.write_str("healthy"),
            Self::Degraded(reason) => write!(f, "degraded: {reason}"),
            Self::Unhealthy(reason) => write!(f, "unhealthy: {reason}"),
        }
    }
}

// --- Conversation types ---

/// A saved report: its current SQL statement and the conversation about it.
///
/// Owned by the host application. The pipeline only reads the statement
/// and the message history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub id: QueryId,
    /// The currently saved statement, if any.
    #[serde(default)]
    pub statement: Option<String>,
    /// Conversation turns, in no guaranteed order.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Query {
    /// Creates a query with no statement and no history.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: QueryId(id.into()),
            statement: None,
            messages: Vec::new(),
        }
    }

    /// Returns the most recent message by creation time.
    ///
    /// Ties resolve to the message appended last.
    pub fn latest_message(&self) -> Option<&Message> {
        self.messages.iter().max_by_key(|m| m.created_at)
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub body: String,
    /// SQL associated with this turn.
    #[serde(default)]
    pub statement: Option<String>,
    /// Reference to the user who wrote the turn; `None` for AI replies.
    #[serde(default)]
    pub creator: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The final output of one report generation.
///
/// `summary` is always populated; `sql` is absent when the model asked for
/// clarification or nothing could be recovered from its reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub summary: String,
    pub sql: Option<String>,
}

// --- Gateway types ---

/// A named string property of a structured-output schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaProperty {
    pub name: String,
    pub description: String,
}

/// Structured-output contract sent along with a gateway request.
///
/// All properties are strings and all are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSchema {
    pub name: String,
    pub description: String,
    pub properties: Vec<SchemaProperty>,
}

impl ResponseSchema {
    /// Renders the schema as a JSON Schema object.
    pub fn to_json_schema(&self) -> serde_json::Value {
        let properties: serde_json::Map<String, serde_json::Value> = self
            .properties
            .iter()
            .map(|p| {
                (
                    p.name.clone(),
                    serde_json::json!({"type": "string", "description": p.description}),
                )
            })
            .collect();
        let required: Vec<&str> = self.properties.iter().map(|p| p.name.as_str()).collect();

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// A single call to the LLM gateway.
#[derive(Debug, Clone)]
pub struct GatewayRequest {
    /// System instructions.
    pub instructions: String,
    /// Structured-output schema; `None` asks for free text.
    pub schema: Option<ResponseSchema>,
    /// The user message.
    pub message: String,
}

/// Token usage reported by the model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The raw reply from the LLM gateway.
///
/// `content` is a JSON object when the model honored the structured-output
/// schema and a JSON string when it answered with free text. Any other
/// shape is unexpected and handled by the response parser.
#[derive(Debug, Clone)]
pub struct GatewayResponse {
    pub content: serde_json::Value,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

// --- Data source types ---

/// A column in a data source table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
}

/// A table in a data source, qualified by its schema namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Schema namespace; `None` means the default namespace.
    #[serde(default)]
    pub schema: Option<String>,
    pub table: String,
    #[serde(default)]
    pub columns: Vec<ColumnSchema>,
}

/// Schema metadata as reported by a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaInfo {
    /// Structured table and column listing.
    Tables(Vec<TableSchema>),
    /// Opaque pre-formatted description.
    Raw(String),
}

// --- Model registry types ---

/// How a scope is invoked and what it resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScopeKind {
    /// A zero-argument scope. `sql` is the precomputed SQL it generates,
    /// or `None` when the host could not resolve it.
    Static {
        #[serde(default)]
        sql: Option<String>,
    },
    /// A scope that takes arguments; only its name is meaningful.
    Parameterized,
}

/// A named, reusable query filter declared on a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: ScopeKind,
}

impl ScopeDescriptor {
    /// A zero-argument scope with resolved SQL.
    pub fn resolved(name: impl Into<String>, sql: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ScopeKind::Static {
                sql: Some(sql.into()),
            },
        }
    }

    /// A zero-argument scope whose SQL could not be resolved.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ScopeKind::Static { sql: None },
        }
    }

    /// A scope that requires arguments.
    pub fn parameterized(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ScopeKind::Parameterized,
        }
    }
}

/// A data-access model registered by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Fully qualified entity name, e.g. `User` or `Billing::Invoice`.
    pub name: String,
    /// Backing table name.
    pub table: String,
    /// Abstract base models carry no table of their own.
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub scopes: Vec<ScopeDescriptor>,
}
