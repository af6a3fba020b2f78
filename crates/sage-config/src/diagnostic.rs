// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Diagnostics for `sage.toml`.
//!
//! Figment reports *where* in the value tree loading failed; this module maps
//! that back onto the TOML text so miette can underline the offending key,
//! and offers a close spelling for keys `sage` does not know.

#![allow(unused_assignments)] // false positive from the `Diagnostic` derive on struct-like variants

use figment::error::Kind;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Jaro-Winkler score a known key must beat to be offered as a correction.
const SIMILARITY_FLOOR: f64 = 0.75;

/// A problem with the loaded configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no `sage.toml` table accepts.
    #[error("unknown key `{key}` {}", table_label(table))]
    #[diagnostic(
        code(sage::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Dotted table the key appeared in; empty for the document root.
        table: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not recognized here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value of the wrong TOML type.
    #[error("`{key}` should be {expected}, found {found}")]
    #[diagnostic(code(sage::config::invalid_type))]
    InvalidType {
        /// Full dotted path, e.g. `llm.max_tokens`.
        key: String,
        found: String,
        expected: String,
        #[label("expected {expected}")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that parsed but is not acceptable.
    #[error("{message}")]
    #[diagnostic(
        code(sage::config::validation),
        help("run `sage check --show` to see the effective configuration")
    )]
    Validation { message: String },

    #[error("configuration error: {0}")]
    #[diagnostic(code(sage::config::other))]
    Other(String),
}

fn table_label(table: &str) -> String {
    if table.is_empty() {
        "at the top level".to_string()
    } else {
        format!("in [{table}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

/// Maps every error figment collected onto a [`ConfigError`].
///
/// `toml_sources` pairs a display name with the text of each TOML file that
/// fed the load; spans are resolved against whichever one figment blames.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| {
            let file = blamed_source(&error, toml_sources);
            let path: Vec<String> = error.path.clone();
            match &error.kind {
                Kind::UnknownField(key, expected) => {
                    let (span, src) = locate(file, &path, key);
                    ConfigError::UnknownKey {
                        key: key.clone(),
                        table: path.join("."),
                        suggestion: suggest_key(key, expected),
                        valid_keys: expected.join(", "),
                        span,
                        src,
                    }
                }
                Kind::InvalidType(found, expected) => {
                    let (span, src) = match path.split_last() {
                        Some((key, table)) => locate(file, table, key),
                        None => (None, None),
                    };
                    ConfigError::InvalidType {
                        key: path.join("."),
                        found: found.to_string(),
                        expected: expected.clone(),
                        span,
                        src,
                    }
                }
                _ => ConfigError::Other(error.to_string()),
            }
        })
        .collect()
}

/// The TOML text figment attributes `error` to.
///
/// Inline strings carry no file name, so a lone source is assumed to be it.
fn blamed_source<'a>(
    error: &figment::Error,
    toml_sources: &'a [(String, String)],
) -> Option<&'a (String, String)> {
    let file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => Some(path.display().to_string()),
            _ => None,
        });

    match (file, toml_sources) {
        (Some(file), _) => toml_sources.iter().find(|(name, _)| *name == file),
        (None, [only]) => Some(only),
        (None, _) => None,
    }
}

fn locate(
    file: Option<&(String, String)>,
    table: &[String],
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let Some((name, content)) = file else {
        return (None, None);
    };
    match find_key_offset(content, table, key) {
        Some(offset) => (
            Some(SourceSpan::new(offset.into(), key.len())),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Byte offset of `key` assigned inside `table` of a TOML document.
///
/// Walks the document line by line, tracking which `[table]` each line
/// belongs to, so a key with the same name under another table is skipped.
/// An empty `table` means keys before the first header.
pub fn find_key_offset(content: &str, table: &[String], key: &str) -> Option<usize> {
    let wanted = table.join(".");
    let mut current = String::new();
    let mut line_start = 0;

    for line in content.split_inclusive('\n') {
        let body = line.trim_start();
        let indent = line.len() - body.len();

        if let Some(header) = table_header(body) {
            current = header;
        } else if current == wanted && assigns(body, key) {
            return Some(line_start + indent);
        }
        line_start += line.len();
    }

    None
}

/// Normalized name of a `[table]` header line, or `None` for other lines.
fn table_header(line: &str) -> Option<String> {
    let code = line.split('#').next().unwrap_or_default().trim();
    let inner = code.strip_prefix('[')?.strip_suffix(']')?;
    let segments: Vec<&str> = inner.split('.').map(str::trim).collect();
    Some(segments.join("."))
}

fn assigns(line: &str, key: &str) -> bool {
    line.strip_prefix(key)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}

/// The known key closest to `unknown`, if any is close enough.
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SIMILARITY_FLOOR)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Renders `errors` as one report, closing with a count when there are several.
pub fn format_errors(errors: &[ConfigError]) -> String {
    let handler = miette::GraphicalReportHandler::new();
    let mut out = String::new();

    for error in errors {
        let mut rendered = String::new();
        match handler.render_report(&mut rendered, error as &dyn Diagnostic) {
            Ok(()) => out.push_str(&rendered),
            Err(_) => out.push_str(&format!("Error: {error}\n")),
        }
    }
    if errors.len() > 1 {
        out.push_str(&format!("{} problems found in configuration\n", errors.len()));
    }
    out
}

/// Writes [`format_errors`] output to stderr.
pub fn render_errors(errors: &[ConfigError]) {
    eprint!("{}", format_errors(errors));
}
