// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL dialect labels derived from database adapter identifiers.

/// Known adapter families, checked in order. Each entry lists substrings
/// of the lower-cased adapter identifier that select the label.
const DIALECTS: &[(&[&str], &str)] = &[
    (&["postgresql", "postgis"], "PostgreSQL"),
    (&["mysql"], "MySQL"),
    (&["sqlite"], "SQLite3"),
    (&["sqlserver", "mssql"], "SQL Server"),
    (&["oracle"], "Oracle"),
];

/// Returns the dialect label used in prompts for an adapter identifier.
///
/// Matching is case-insensitive and by substring, so `PostGIS` and
/// `mysql2` resolve to their families. Unknown adapters fall back to the
/// identifier itself, lower-cased with its first letter capitalized.
pub fn detect_dialect(adapter: &str) -> String {
    let adapter = adapter.to_lowercase();

    for (patterns, label) in DIALECTS {
        if patterns.iter().any(|p| adapter.contains(p)) {
            return (*label).to_string();
        }
    }

    capitalize(&adapter)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_families_map_to_labels() {
        assert_eq!(detect_dialect("postgresql"), "PostgreSQL");
        assert_eq!(detect_dialect("PostGIS"), "PostgreSQL");
        assert_eq!(detect_dialect("mysql2"), "MySQL");
        assert_eq!(detect_dialect("Trilogy-MySQL"), "MySQL");
        assert_eq!(detect_dialect("sqlite"), "SQLite3");
        assert_eq!(detect_dialect("SQLServer"), "SQL Server");
        assert_eq!(detect_dialect("mssql"), "SQL Server");
        assert_eq!(detect_dialect("oracle_enhanced"), "Oracle");
    }

    #[test]
    fn unknown_adapter_is_capitalized() {
        assert_eq!(detect_dialect("snowflake"), "Snowflake");
        assert_eq!(detect_dialect("CLICKHOUSE"), "Clickhouse");
    }

    #[test]
    fn empty_adapter_never_errors() {
        assert_eq!(detect_dialect(""), "");
    }
}
