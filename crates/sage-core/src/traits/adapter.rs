// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base adapter trait for connections whose health can be checked before use.

use async_trait::async_trait;

use crate::error::SageError;
use crate::types::HealthStatus;

/// The base trait for Sage data source adapters.
///
/// Provides identity and health check capabilities; `sage check` reports
/// the health of the configured data source through it.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Returns the human-readable name of this adapter instance.
    fn name(&self) -> &str;

    /// Performs a health check and returns the adapter's current status.
    ///
    /// `Err` is reserved for failures of the check itself; a reachable but
    /// broken backend reports [`HealthStatus::Unhealthy`].
    async fn health_check(&self) -> Result<HealthStatus, SageError>;
}
