// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Sage report pipeline.

use thiserror::Error;

/// The primary error type used across all Sage adapter traits and core operations.
///
/// Context-building and parsing failures never surface as a `SageError`; they
/// degrade locally. Only configuration, gateway, and consumer failures reach
/// the caller.
#[derive(Debug, Error)]
pub enum SageError {
    /// Configuration errors (invalid TOML, missing API key, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Data source errors (connection failure, schema introspection failure).
    #[error("data source error: {message}")]
    DataSource {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Model registry errors (catalog unreadable, malformed descriptors).
    #[error("model registry error: {message}")]
    Registry { message: String },

    /// LLM gateway errors (network failure, authentication, model error).
    #[error("gateway error: {message}")]
    Gateway {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Result consumer errors (persisting or broadcasting the reply failed).
    #[error("consumer error: {message}")]
    Consumer {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SageError {
    /// Shorthand for a data source error without an underlying cause.
    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a gateway error without an underlying cause.
    pub fn gateway(message: impl Into<String>) -> Self {
        Self::Gateway {
            message: message.into(),
            source: None,
        }
    }
}
