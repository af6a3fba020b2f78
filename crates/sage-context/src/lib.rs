// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt context assembly for Sage report generation.
//!
//! Gathers the pieces the model needs to write SQL for a request:
//! - **Schema**: tables and columns from a named data source
//! - **Scopes**: reusable query patterns registered by the host application
//! - **Prompt**: base instructions, conversation context, and generation rules
//!
//! Context that cannot be loaded is omitted from the prompt rather than
//! failing the request.

pub mod dialect;
pub mod prompt;
pub mod schema;
pub mod scopes;

pub use dialect::detect_dialect;
pub use prompt::{ComposedPrompt, PromptComposer};
pub use schema::{SchemaContextBuilder, render_schema};
pub use scopes::{ScopeContextBuilder, normalize_scope_sql};
