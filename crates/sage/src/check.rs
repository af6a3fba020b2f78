// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sage check`: configuration summary and data source health.

use std::path::Path;
use std::time::{Duration, Instant};

use sage_config::SageConfig;
use sage_core::{HealthStatus, PluginAdapter, SageError};

use crate::pipeline::open_data_source;

/// Outcome of checking the configured data source.
#[derive(Debug)]
pub struct DataSourceCheck {
    pub name: String,
    /// `None` when no database is configured.
    pub status: Option<HealthStatus>,
    pub duration: Duration,
}

impl DataSourceCheck {
    /// One-line human-readable report.
    pub fn describe(&self) -> String {
        match &self.status {
            Some(status) => format!(
                "data source {}: {status} ({}ms)",
                self.name,
                self.duration.as_millis()
            ),
            None => format!(
                "data source {}: skipped (no database_path configured)",
                self.name
            ),
        }
    }

    pub fn is_unhealthy(&self) -> bool {
        matches!(self.status, Some(HealthStatus::Unhealthy(_)))
    }
}

/// Opens the configured data source and runs its health check.
///
/// Every failure is reported as a status; nothing here returns an error.
pub async fn check_data_source(config: &SageConfig) -> DataSourceCheck {
    let start = Instant::now();
    let name = config.data_source.name.clone();

    let status = match config.data_source.database_path.as_deref() {
        None => None,
        Some(path) if !Path::new(path).exists() => {
            Some(HealthStatus::Unhealthy(format!("not found: {path}")))
        }
        Some(path) => Some(health_of(&name, path).await),
    };

    DataSourceCheck {
        name,
        status,
        duration: start.elapsed(),
    }
}

async fn health_of(name: &str, path: &str) -> HealthStatus {
    let source = match open_data_source(name, path).await {
        Ok(source) => source,
        Err(e) => return HealthStatus::Unhealthy(format!("open failed: {e}")),
    };
    source
        .health_check()
        .await
        .unwrap_or_else(|e: SageError| HealthStatus::Unhealthy(e.to_string()))
}
