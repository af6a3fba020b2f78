// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite data source for Sage.
//!
//! Describes a SQLite database's tables and columns so the model can be
//! given exact names. All access goes through tokio-rusqlite's background
//! thread.

pub mod data_source;

pub use data_source::SqliteDataSource;
