// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured-output contract for report responses.

use sage_core::types::{ResponseSchema, SchemaProperty};

/// Name under which the schema is declared to the model.
pub const REPORT_RESPONSE: &str = "report_response";

/// The `{sql, summary}` schema the model is asked to fill.
pub fn report_response_schema() -> ResponseSchema {
    ResponseSchema {
        name: REPORT_RESPONSE.to_string(),
        description: "Return the generated SQL and a summary of the report".to_string(),
        properties: vec![
            SchemaProperty {
                name: "sql".to_string(),
                description: "Generated SQL based on user prompt".to_string(),
            },
            SchemaProperty {
                name: "summary".to_string(),
                description: "Natural language summary of generated report".to_string(),
            },
        ],
    }
}
