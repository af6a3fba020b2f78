// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report generation pipeline for Sage.
//!
//! Turns a natural-language request about a saved query into a
//! `{summary, sql}` result:
//!
//! - [`ReportContext`] builds the prompt from configuration and registries
//! - [`ReportProcessor`] sends that prompt to the model once and parses the
//!   reply
//! - [`parser`] recovers `{summary, sql}` from well-formed or malformed replies
//! - [`ReportJob`] wraps the processor with consumer notifications

pub mod context;
pub mod job;
pub mod parser;
pub mod processor;
pub mod schema;

pub use context::ReportContext;
pub use job::ReportJob;
pub use parser::{ParseTier, ParsedResponse, parse_response};
pub use processor::{EMPTY_SUMMARY_FALLBACK, ReportProcessor, finalize};
pub use schema::report_response_schema;
