// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the DataSource trait.

use async_trait::async_trait;
use tracing::debug;

use sage_core::types::{ColumnSchema, HealthStatus, SchemaInfo, TableSchema};
use sage_core::{DataSource, PluginAdapter, SageError};

/// Schema namespace SQLite reports for the primary database.
const MAIN_NAMESPACE: &str = "main";

const TABLES_SQL: &str = "SELECT name FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
     ORDER BY name";

const TABLE_COUNT_SQL: &str = "SELECT count(*) FROM sqlite_master \
     WHERE type = 'table' AND name NOT LIKE 'sqlite_%'";

const COLUMNS_SQL: &str = "SELECT name, type FROM pragma_table_info(?1) ORDER BY cid";

fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> SageError {
    SageError::DataSource {
        message: format!("sqlite error: {e}"),
        source: Some(Box::new(e)),
    }
}

/// A named SQLite database offered to the model as schema context.
pub struct SqliteDataSource {
    name: String,
    conn: tokio_rusqlite::Connection,
}

impl SqliteDataSource {
    /// Wraps an open connection.
    pub fn new(name: impl Into<String>, conn: tokio_rusqlite::Connection) -> Self {
        Self {
            name: name.into(),
            conn,
        }
    }

    /// Opens the database file at `path`.
    pub async fn open(name: impl Into<String>, path: &str) -> Result<Self, SageError> {
        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| SageError::DataSource {
                message: format!("failed to open {path}: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self::new(name, conn))
    }

    /// Lists user tables in name order with their columns in declaration order.
    pub async fn tables(&self) -> Result<Vec<TableSchema>, SageError> {
        let tables = self
            .conn
            .call(|conn| -> Result<Vec<TableSchema>, rusqlite::Error> {
                let names: Vec<String> = {
                    let mut stmt = conn.prepare(TABLES_SQL)?;
                    stmt.query_map([], |row| row.get(0))?
                        .collect::<Result<_, _>>()?
                };

                let mut columns_stmt = conn.prepare(COLUMNS_SQL)?;
                let mut tables = Vec::with_capacity(names.len());
                for table in names {
                    let columns = columns_stmt
                        .query_map([&table], |row| {
                            Ok(ColumnSchema {
                                name: row.get(0)?,
                                data_type: row.get(1)?,
                            })
                        })?
                        .collect::<Result<Vec<_>, _>>()?;
                    tables.push(TableSchema {
                        schema: Some(MAIN_NAMESPACE.to_string()),
                        table,
                        columns,
                    });
                }
                Ok(tables)
            })
            .await
            .map_err(map_tr_err)?;

        debug!(data_source = %self.name, tables = tables.len(), "introspected sqlite schema");
        Ok(tables)
    }
}

#[async_trait]
impl PluginAdapter for SqliteDataSource {
    fn name(&self) -> &str {
        &self.name
    }

    /// Healthy when the file reads as a database with at least one user
    /// table; degraded when it has none, since the schema section would
    /// then be omitted.
    async fn health_check(&self) -> Result<HealthStatus, SageError> {
        let tables = self
            .conn
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(TABLE_COUNT_SQL, [], |row| row.get(0))
            })
            .await;

        let status = match tables {
            Ok(0) => HealthStatus::Degraded("no tables to describe".to_string()),
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(format!("query failed: {e}")),
        };
        debug!(data_source = %self.name, %status, "sqlite health check");
        Ok(status)
    }
}

#[async_trait]
impl DataSource for SqliteDataSource {
    async fn schema(&self) -> Result<Option<SchemaInfo>, SageError> {
        Ok(Some(SchemaInfo::Tables(self.tables().await?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn fixture(dir: &tempfile::TempDir) -> SqliteDataSource {
        let path = dir.path().join("shop.db");
        let source = SqliteDataSource::open("main", path.to_str().unwrap()).await.unwrap();
        source
            .conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(
                    "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL, activated_at DATETIME);
                     CREATE TABLE orders (id INTEGER PRIMARY KEY AUTOINCREMENT, user_id INTEGER, total NUMERIC);
                     CREATE INDEX orders_user ON orders (user_id);",
                )?;
                Ok(())
            })
            .await
            .unwrap();
        source
    }

    #[tokio::test]
    async fn lists_tables_by_name_and_columns_by_position() {
        let dir = tempdir().unwrap();
        let source = fixture(&dir).await;

        let tables = source.tables().await.unwrap();
        let names: Vec<&str> = tables.iter().map(|t| t.table.as_str()).collect();
        assert_eq!(names, vec!["orders", "users"]);

        let users = &tables[1];
        assert_eq!(users.schema.as_deref(), Some("main"));
        let columns: Vec<(&str, &str)> = users
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.data_type.as_str()))
            .collect();
        assert_eq!(
            columns,
            vec![("id", "INTEGER"), ("email", "TEXT"), ("activated_at", "DATETIME")]
        );
    }

    #[tokio::test]
    async fn internal_tables_are_hidden() {
        let dir = tempdir().unwrap();
        let source = fixture(&dir).await;
        // AUTOINCREMENT creates sqlite_sequence.
        let tables = source.tables().await.unwrap();
        assert!(tables.iter().all(|t| !t.table.starts_with("sqlite_")));
    }

    #[tokio::test]
    async fn schema_is_stable_across_calls() {
        let dir = tempdir().unwrap();
        let source = fixture(&dir).await;
        assert_eq!(source.schema().await.unwrap(), source.schema().await.unwrap());
    }

    #[tokio::test]
    async fn empty_database_has_empty_listing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.db");
        let source = SqliteDataSource::open("main", path.to_str().unwrap()).await.unwrap();
        assert_eq!(source.schema().await.unwrap(), Some(SchemaInfo::Tables(vec![])));
        assert_eq!(
            source.health_check().await.unwrap(),
            HealthStatus::Degraded("no tables to describe".into())
        );
    }

    #[tokio::test]
    async fn database_with_tables_is_healthy() {
        let dir = tempdir().unwrap();
        let source = fixture(&dir).await;
        assert_eq!(source.name(), "main");
        assert_eq!(source.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn non_database_file_is_unhealthy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.db");
        std::fs::write(&path, "this is not a sqlite database, just some text padding it out").unwrap();

        let source = SqliteDataSource::open("main", path.to_str().unwrap()).await.unwrap();
        match source.health_check().await.unwrap() {
            HealthStatus::Unhealthy(reason) => assert!(reason.starts_with("query failed")),
            other => panic!("expected unhealthy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn open_failure_is_a_data_source_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("x.db");
        let err = SqliteDataSource::open("main", path.to_str().unwrap()).await;
        assert!(matches!(err, Err(SageError::DataSource { .. })));
    }
}
