// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tolerant parsing of model replies into `{summary, sql}`.
//!
//! Replies are tried against a ladder of recovery tiers and the first one
//! that succeeds wins:
//!
//! 1. **Structured**: the reply is already a JSON object.
//! 2. **Direct**: the reply text parses as a JSON object.
//! 3. **Repaired**: raw newlines, tabs and carriage returns inside quoted
//!    spans are escaped, then the text is parsed again.
//! 4. **Extracted**: `"sql": "..."` and `"summary": "..."` are pulled out
//!    independently with regexes.
//!
//! The parser never fails. When nothing can be recovered the summary
//! carries a fixed message asking the user to retry.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};
use strum::Display;
use tracing::{debug, error, warn};

/// Summary used when no summary could be recovered from text.
pub const PARSE_FAILED_SUMMARY: &str = "Failed to parse response. Please try again.";

/// Summary used when the reply is neither an object nor text.
pub const UNEXPECTED_FORMAT_SUMMARY: &str = "Unexpected response format. Please try again.";

static QUOTED_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("quoted span pattern is valid"));

static SQL_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"sql"\s*:\s*"((?:[^"\\]|\\.)*)""#).expect("sql field pattern is valid")
});

static SUMMARY_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"summary"\s*:\s*"((?:[^"\\]|\\.)*)""#)
        .expect("summary field pattern is valid")
});

/// The recovery tier that produced a [`ParsedResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ParseTier {
    Structured,
    Direct,
    Repaired,
    Extracted,
    Unexpected,
}

/// Values recovered from a model reply.
///
/// `summary` is `None` only when a JSON object carried no usable summary;
/// the orchestrator substitutes its own default in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedResponse {
    pub summary: Option<String>,
    pub sql: Option<String>,
    pub tier: ParseTier,
}

impl ParsedResponse {
    fn from_object(object: &Map<String, Value>, tier: ParseTier) -> Self {
        Self {
            summary: field(object, "summary"),
            sql: field(object, "sql"),
            tier,
        }
    }
}

/// Parses raw reply content.
///
/// Objects are read directly, strings go through the text tiers, and any
/// other JSON value yields the unexpected-format message.
pub fn parse_response(content: &Value) -> ParsedResponse {
    match content {
        Value::Object(object) => ParsedResponse::from_object(object, ParseTier::Structured),
        Value::String(text) => parse_text(text),
        other => {
            warn!(kind = value_kind(other), "unexpected response format");
            ParsedResponse {
                summary: Some(UNEXPECTED_FORMAT_SUMMARY.to_string()),
                sql: None,
                tier: ParseTier::Unexpected,
            }
        }
    }
}

/// Parses a free-text reply through the direct, repaired and extracted tiers.
pub fn parse_text(text: &str) -> ParsedResponse {
    let direct_err = match parse_object(text) {
        Ok(object) => return ParsedResponse::from_object(&object, ParseTier::Direct),
        Err(e) => e,
    };
    debug!(error = %direct_err, "reply is not valid JSON, repairing quoted spans");

    let repaired = repair_json(text);
    let repair_err = match parse_object(&repaired) {
        Ok(object) => return ParsedResponse::from_object(&object, ParseTier::Repaired),
        Err(e) => e,
    };
    warn!(error = %repair_err, "failed to parse JSON even after repair, extracting fields");

    extract_fields(text)
}

/// Escapes raw `\n`, `\t` and `\r` inside every double-quoted span.
pub fn repair_json(text: &str) -> String {
    QUOTED_SPAN
        .replace_all(text, |caps: &Captures<'_>| escape_control_chars(&caps[0]))
        .into_owned()
}

fn escape_control_chars(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\t', "\\t")
        .replace('\r', "\\r")
}

fn extract_fields(text: &str) -> ParsedResponse {
    let sql = capture(&SQL_FIELD, text);
    let summary = capture(&SUMMARY_FIELD, text);

    if sql.is_none() || summary.is_none() {
        error!(
            found_sql = sql.is_some(),
            found_summary = summary.is_some(),
            "could not extract sql and summary from response"
        );
    }

    ParsedResponse {
        summary: Some(summary.unwrap_or_else(|| PARSE_FAILED_SUMMARY.to_string())),
        sql,
        tier: ParseTier::Extracted,
    }
}

fn capture(pattern: &Regex, text: &str) -> Option<String> {
    let raw = pattern.captures(text)?.get(1)?.as_str();
    Some(unescape(raw))
}

/// Decodes JSON escapes in a captured span, keeping it raw when the span
/// is not a valid JSON string body even after raw control characters are
/// escaped.
fn unescape(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{}\"", escape_control_chars(raw)))
        .unwrap_or_else(|_| raw.to_string())
}

enum ObjectError {
    Syntax(serde_json::Error),
    NotAnObject(&'static str),
}

impl std::fmt::Display for ObjectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(e) => write!(f, "{e}"),
            Self::NotAnObject(kind) => write!(f, "expected a JSON object, found {kind}"),
        }
    }
}

fn parse_object(text: &str) -> Result<Map<String, Value>, ObjectError> {
    match serde_json::from_str::<Value>(text).map_err(ObjectError::Syntax)? {
        Value::Object(object) => Ok(object),
        other => Err(ObjectError::NotAnObject(value_kind(&other))),
    }
}

/// Reads a key as text: `null` is absent, strings are taken as-is, and
/// other values are rendered as JSON.
fn field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
