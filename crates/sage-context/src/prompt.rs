// SPDX-FileCopyrightText: 2026 Sage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt composition: assembles the system instructions and the user
//! message sent to the model for one report request.
//!
//! Sections are emitted in a fixed order:
//!
//! 1. base instructions (with the dialect label)
//! 2. `## CURRENT QUERY (BASELINE)` when the query has a statement
//! 3. `## PREVIOUS CONTEXT` when the query has messages
//! 4. the database schema, when available
//! 5. the scope reference, when available
//! 6. `## QUERY GENERATION RULES`

use sage_config::SageConfig;
use sage_core::types::Query;

use crate::dialect::detect_dialect;

/// Placeholder substituted with the dialect label.
const DIALECT_SLOT: &str = "{dialect}";

/// Base instructions. `{dialect}` is replaced with the dialect label.
pub const BASE_INSTRUCTIONS: &str = r#"You are an expert SQL analyst helping users iteratively refine their database queries.

DATABASE TYPE: {dialect}

Your task:
1. Analyze the user's natural language request
2. Determine if you should:
   a) Modify the most recent SQL query (from Previous Context if available)
   b) Modify the baseline query (from Current Query section)
   c) Create an entirely new query if the request is unrelated
3. Generate the appropriate SQL query for {dialect}
4. Provide a clear explanation of what changed and why

Response format (STRICT JSON):
{
  "summary": "Explain what this query does and what changes were made from the previous version (if any)",
  "sql": "The complete SQL query statement"
}

CLARIFICATION REQUIRED: If you're unsure how to query based on certain criteria:
- Return a summary asking for clarification
- Set sql to null
- Example: {"summary": "I need clarification on what you mean by 'activated accounts'. Do you mean users with a specific status, users who have logged in, or users with a certain field set?", "sql": null}

IMPORTANT: 
- Always return the COMPLETE query, not just the changes
- When producing SQL, exclude ALL comments and extraneous characters - the SQL will be immediately executed against a database
- Format SQL to be human readable, per SQL writing best practices, but still executable
- When modifying existing queries, preserve the original intent while incorporating the requested changes
- If the user asks for adjustments (e.g., "add a filter", "group by X", "sort differently"), modify the most recent query
- If the user asks something completely new, create a fresh query

Guidelines:
- Write efficient, readable SQL using {dialect}-specific syntax
- Use meaningful table aliases and column names
- Do NOT include comments in SQL queries - they will be executed directly
- Prefer JOINs over subqueries when appropriate
- Consider performance implications for large datasets
- ROLE HANDLING: When dealing with "roles" (e.g., "candidates", "employers", synonyms of "users"):
  * ALWAYS check the users model/table/scopes first to understand how roles are established
  * Look for role-related columns, scopes, or associations in the users table
  * Map role-related terms to the actual implementation in the database
- SCOPE PRIORITIZATION: ALWAYS prioritize matching user requests to available model scopes
  * FIRST check if any existing scopes match the user's intent
  * Use scopes as the PRIMARY source for query patterns
  * Only write custom SQL when no appropriate scope exists
  * Analyze the intent behind user queries and map them to corresponding scopes
  * When users describe filters or conditions, identify matching scope patterns
  * Example: if user asks for "recent items", look for scopes like "recent", "latest", or time-based scopes
- JSONB COLUMNS: NEVER guess at JSONB column keys or values
  * Only query JSONB fields that are explicitly defined in scopes or schema documentation
  * If JSONB structure is unknown, do NOT attempt to query specific keys
  * Avoid assumptions about JSONB content unless explicitly documented
- PRESENCE CHECKS: For presence/existence checks:
  * Use "IS NOT NULL" or "IS NULL" for presence/absence checks
  * Avoid using literal values like 'true' or specific strings unless explicitly required
  * For boolean presence, check for NOT NULL rather than = true
  * Example: Use "activated_at IS NOT NULL" instead of "activated = 'true'"
- Ensure all table and column names match the schema exactly
- Handle NULL values appropriately (prefer IS NULL/IS NOT NULL for presence checks)
- Use proper data type casting when needed
- Follow {dialect} best practices and syntax conventions
- NEVER make assumptions about data structure - use only what's documented in schema and scopes
"#;

/// Numbered generation rules closing every prompt.
const GENERATION_RULES: &[&str] = &[
    "\n\n## QUERY GENERATION RULES",
    "1. Match table and column names EXACTLY as shown in the schema",
    "2. NO COMMENTS OR NEWLINES in SQL - output will be executed directly against database",
    "3. SCOPE FIRST: ALWAYS prioritize using available scopes over custom SQL",
    "   - Check ALL available scopes before writing custom conditions",
    "   - Map user language directly to scope names when possible",
    "4. JSONB HANDLING: NEVER guess at JSONB structure",
    "   - Only use JSONB keys that are explicitly documented in scopes or schema",
    "   - If unsure about JSONB structure, avoid querying it",
    "5. PRESENCE/ABSENCE CHECKS:",
    "   - Use IS NOT NULL for presence (not = 'true' or = true)",
    "   - Use IS NULL for absence",
    "   - Example: 'activated users' → 'activated_at IS NOT NULL'",
    "6. ROLE HANDLING: When users mention roles like 'candidates' or 'employers':",
    "   - Check the users table/model/scopes first to understand role implementation",
    "   - Map role terms to actual database structure (columns, associations, etc.)",
    "7. Generate ONE query that best answers the user's request",
    "8. NEVER make assumptions - use only documented schema and scopes",
];

/// Directive appended to every user request.
pub const OUTPUT_DIRECTIVE: &str =
    "Return as a JSON object with sql and summary keys and no additional commentary.\n";

/// The instructions and user message for one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPrompt {
    pub instructions: String,
    pub message: String,
}

/// Composes prompts for a fixed dialect.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    dialect: String,
    extra_instructions: Option<String>,
}

impl PromptComposer {
    /// Creates a composer for a dialect label such as `PostgreSQL`.
    pub fn new(dialect: impl Into<String>) -> Self {
        Self {
            dialect: dialect.into(),
            extra_instructions: None,
        }
    }

    /// Creates a composer from configuration: the dialect comes from
    /// `data_source.adapter` and operator text from `prompt.extra_instructions`.
    pub fn from_config(config: &SageConfig) -> Self {
        Self::new(detect_dialect(&config.data_source.adapter))
            .with_extra_instructions(config.prompt.extra_instructions.clone())
    }

    /// Sets operator text placed ahead of the base instructions.
    /// Blank text is ignored.
    pub fn with_extra_instructions(mut self, extra: Option<String>) -> Self {
        self.extra_instructions = extra.filter(|s| !is_blank(s));
        self
    }

    pub fn dialect(&self) -> &str {
        &self.dialect
    }

    /// Builds the system instructions for `query`.
    ///
    /// `schema` and `scopes` are the pre-rendered context sections; `None`
    /// or blank text omits the section.
    pub fn instructions(&self, query: &Query, schema: Option<&str>, scopes: Option<&str>) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(extra) = &self.extra_instructions {
            parts.push(extra.clone());
        }
        parts.push(BASE_INSTRUCTIONS.replace(DIALECT_SLOT, &self.dialect));

        if let Some(statement) = query.statement.as_deref().filter(|s| !is_blank(s)) {
            parts.push("\n\n## CURRENT QUERY (BASELINE)\n".to_string());
            parts.push("The currently saved query that we're working with:\n".to_string());
            parts.push(format!("```sql\n{statement}\n```"));
            parts.push(
                "\nThis is the baseline query. You may modify or completely replace it based on the user's request.\n"
                    .to_string(),
            );
        }

        if let Some(latest) = query.latest_message() {
            parts.push("\n\n## PREVIOUS CONTEXT\n".to_string());
            parts.push("The most recent message from this conversation:\n".to_string());
            if !is_blank(&latest.body) {
                parts.push(format!("\nPrevious response: {}", latest.body));
            }
            if let Some(sql) = latest.statement.as_deref().filter(|s| !is_blank(s)) {
                parts.push(format!("\nPrevious SQL: {sql}"));
            }
            parts.push("\n\nConsider this context when generating your response.\n".to_string());
        }

        for section in [schema, scopes].into_iter().flatten() {
            if !is_blank(section) {
                parts.push(section.to_string());
            }
        }

        parts.extend(GENERATION_RULES.iter().map(|rule| (*rule).to_string()));
        parts.join("\n")
    }

    /// Builds the user message: the request text, `". "`, and the output
    /// directive.
    pub fn message(&self, prompt: &str) -> String {
        format!("{prompt}. {OUTPUT_DIRECTIVE}")
    }

    /// Builds both halves of the prompt.
    pub fn compose(
        &self,
        query: &Query,
        prompt: &str,
        schema: Option<&str>,
        scopes: Option<&str>,
    ) -> ComposedPrompt {
        ComposedPrompt {
            instructions: self.instructions(query, schema, scopes),
            message: self.message(prompt),
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sage_core::types::Message;

    fn message(body: &str, statement: Option<&str>, minute: u32) -> Message {
        Message {
            body: body.into(),
            statement: statement.map(String::from),
            creator: None,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap(),
        }
    }

    fn position(haystack: &str, needle: &str) -> usize {
        haystack
            .find(needle)
            .unwrap_or_else(|| panic!("missing section {needle:?}"))
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let mut query = Query::new("7");
        query.statement = Some("SELECT * FROM orders".into());
        query.messages.push(message("Here are the orders", Some("SELECT 1"), 5));

        let text = PromptComposer::new("PostgreSQL").instructions(
            &query,
            Some("\n\n## DATABASE SCHEMA\nschema"),
            Some("\n\n## REFERENCE: COMMON QUERY PATTERNS\nscopes"),
        );

        let order = [
            "You are an expert SQL analyst",
            "## CURRENT QUERY (BASELINE)",
            "## PREVIOUS CONTEXT",
            "## DATABASE SCHEMA",
            "## REFERENCE: COMMON QUERY PATTERNS",
            "## QUERY GENERATION RULES",
        ];
        let positions: Vec<usize> = order.iter().map(|s| position(&text, s)).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn dialect_is_substituted_everywhere() {
        let text = PromptComposer::new("MySQL").instructions(&Query::new("1"), None, None);
        assert!(text.contains("DATABASE TYPE: MySQL"));
        assert!(text.contains("Generate the appropriate SQL query for MySQL"));
        assert!(text.contains("Follow MySQL best practices"));
        assert!(!text.contains(DIALECT_SLOT));
    }

    #[test]
    fn blank_statement_omits_baseline() {
        let mut query = Query::new("1");
        query.statement = Some("   ".into());
        let text = PromptComposer::new("SQLite3").instructions(&query, None, None);
        assert!(!text.contains("CURRENT QUERY"));
        assert!(!text.contains("PREVIOUS CONTEXT"));
    }

    #[test]
    fn baseline_is_fenced() {
        let mut query = Query::new("1");
        query.statement = Some("SELECT * FROM users".into());
        let text = PromptComposer::new("SQLite3").instructions(&query, None, None);
        assert!(text.contains("```sql\nSELECT * FROM users\n```"));
    }

    #[test]
    fn previous_context_uses_most_recent_message() {
        let mut query = Query::new("1");
        query.messages = vec![
            message("newer reply", Some("SELECT 2"), 30),
            message("older reply", Some("SELECT 1"), 10),
        ];
        let text = PromptComposer::new("SQLite3").instructions(&query, None, None);
        assert!(text.contains("\nPrevious response: newer reply"));
        assert!(text.contains("\nPrevious SQL: SELECT 2"));
        assert!(!text.contains("older reply"));
    }

    #[test]
    fn previous_context_skips_blank_fields() {
        let mut query = Query::new("1");
        query.messages.push(message("", None, 1));
        let text = PromptComposer::new("SQLite3").instructions(&query, None, None);
        assert!(text.contains("## PREVIOUS CONTEXT"));
        assert!(!text.contains("Previous response:"));
        assert!(!text.contains("Previous SQL:"));
    }

    #[test]
    fn rules_close_the_prompt() {
        let text = PromptComposer::new("Oracle").instructions(&Query::new("1"), None, None);
        assert!(text.ends_with("8. NEVER make assumptions - use only documented schema and scopes"));
        assert!(text.contains("\n\n\n## QUERY GENERATION RULES\n1. Match table"));
    }

    #[test]
    fn message_appends_directive() {
        let composer = PromptComposer::new("PostgreSQL");
        assert_eq!(
            composer.message("count users"),
            "count users. Return as a JSON object with sql and summary keys and no additional commentary.\n"
        );
    }

    #[test]
    fn extra_instructions_lead_the_prompt() {
        let composer = PromptComposer::new("PostgreSQL")
            .with_extra_instructions(Some("Always alias tables.".into()));
        let text = composer.instructions(&Query::new("1"), None, None);
        assert!(text.starts_with("Always alias tables.\nYou are an expert SQL analyst"));
    }

    #[test]
    fn blank_extra_instructions_are_ignored() {
        let composer = PromptComposer::new("PostgreSQL").with_extra_instructions(Some(" \n".into()));
        let text = composer.instructions(&Query::new("1"), None, None);
        assert!(text.starts_with("You are an expert SQL analyst"));
    }

    #[test]
    fn from_config_detects_dialect() {
        let mut config = SageConfig::default();
        config.data_source.adapter = "postgis".into();
        assert_eq!(PromptComposer::from_config(&config).dialect(), "PostgreSQL");
    }
}
