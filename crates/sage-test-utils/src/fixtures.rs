// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sample schemas, models, and queries shared across test suites.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use sage_core::traits::DataSource;
use sage_core::types::{
    ColumnSchema, Message, ModelDescriptor, Query, SchemaInfo, ScopeDescriptor, TableSchema,
};

/// A two-table schema: `users` and `orders` in the default namespace.
pub fn shop_schema() -> SchemaInfo {
    SchemaInfo::Tables(vec![
        table("users", &[("id", "integer"), ("email", "character varying"), ("activated_at", "timestamp")]),
        table("orders", &[("id", "integer"), ("user_id", "integer"), ("total", "numeric")]),
    ])
}

fn table(name: &str, columns: &[(&str, &str)]) -> TableSchema {
    TableSchema {
        schema: None,
        table: name.to_string(),
        columns: columns
            .iter()
            .map(|(n, t)| ColumnSchema {
                name: n.to_string(),
                data_type: t.to_string(),
            })
            .collect(),
    }
}

/// Models for the shop schema, plus one engine model that must be skipped.
pub fn shop_models() -> Vec<ModelDescriptor> {
    vec![
        ModelDescriptor {
            name: "User".into(),
            table: "users".into(),
            is_abstract: false,
            scopes: vec![
                ScopeDescriptor::resolved(
                    "activated",
                    r#"SELECT "users".* FROM "users" WHERE "users"."activated_at" IS NOT NULL"#,
                ),
                ScopeDescriptor::parameterized("created_after"),
            ],
        },
        ModelDescriptor {
            name: "Sage::Message".into(),
            table: "sage_messages".into(),
            is_abstract: false,
            scopes: vec![ScopeDescriptor::unresolved("recent")],
        },
    ]
}

/// A registry map holding one data source under `name`.
pub fn registry_with(name: &str, source: Arc<dyn DataSource>) -> HashMap<String, Arc<dyn DataSource>> {
    HashMap::from([(name.to_string(), source)])
}

/// A fixed timestamp `minutes` past a reference instant.
pub fn at_minute(minutes: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap() + chrono::Duration::minutes(minutes.into())
}

/// A query with a saved statement and one earlier AI reply.
pub fn query_with_history() -> Query {
    let mut query = Query::new("42");
    query.statement = Some("SELECT * FROM users".into());
    query.messages.push(Message {
        body: "All users".into(),
        statement: Some("SELECT * FROM users".into()),
        creator: None,
        created_at: at_minute(0),
    });
    query
}
