//! Allow-list policy for caller-supplied SQL.
//!
//! The default [`PolicyMode::Prefix`] mode accepts any statement whose
//! trimmed, lower-cased text starts with an allowed keyword. It is a literal
//! prefix check: leading comments are rejected, and whatever follows the
//! keyword (including stacked statements, if the driver would run them) is
//! not inspected. [`PolicyMode::Strict`] tokenizes the input, skips leading
//! comments, requires a whole-word keyword and refuses stacked statements.

use std::fmt;

use super::error::{
    QueryError, Result, FORBIDDEN_MESSAGE, MULTIPLE_STATEMENTS_MESSAGE, UNREADABLE_MESSAGE,
};
use super::lexer::{Lexer, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select,
    Pragma,
}

impl Command {
    /// Every command the console accepts, in the order reported to callers.
    pub const ALLOWED: [Command; 2] = [Command::Select, Command::Pragma];

    pub fn keyword(self) -> &'static str {
        match self {
            Command::Select => "select",
            Command::Pragma => "pragma",
        }
    }

    fn from_word(word: &str) -> Option<Self> {
        Self::ALLOWED
            .into_iter()
            .find(|c| word.eq_ignore_ascii_case(c.keyword()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Lower-case keywords of [`Command::ALLOWED`].
pub fn allowed_commands() -> Vec<&'static str> {
    Command::ALLOWED.iter().map(|c| c.keyword()).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PolicyMode {
    #[default]
    Prefix,
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryPolicy {
    mode: PolicyMode,
}

impl QueryPolicy {
    pub fn new(mode: PolicyMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(PolicyMode::Strict)
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    /// Decides whether `sql` may be executed. The text itself is never
    /// rewritten; callers execute exactly what they passed in.
    pub fn classify(&self, sql: &str) -> Result<Command> {
        match self.mode {
            PolicyMode::Prefix => classify_prefix(sql),
            PolicyMode::Strict => classify_strict(sql),
        }
    }
}

fn classify_prefix(sql: &str) -> Result<Command> {
    let normalized = sql.trim().to_lowercase();
    Command::ALLOWED
        .into_iter()
        .find(|c| normalized.starts_with(c.keyword()))
        .ok_or_else(|| forbidden(sql, FORBIDDEN_MESSAGE))
}

fn classify_strict(sql: &str) -> Result<Command> {
    let tokens = Lexer::new(sql)
        .tokenize()
        .map_err(|_| forbidden(sql, UNREADABLE_MESSAGE))?;

    let command = match tokens.first().map(|t| &t.kind) {
        Some(TokenKind::Word(word)) => Command::from_word(word),
        _ => None,
    }
    .ok_or_else(|| forbidden(sql, FORBIDDEN_MESSAGE))?;

    let mut terminated = false;
    for token in &tokens[1..] {
        match token.kind {
            TokenKind::Semicolon => terminated = true,
            TokenKind::Eof => break,
            _ if terminated => return Err(forbidden(sql, MULTIPLE_STATEMENTS_MESSAGE)),
            _ => {}
        }
    }

    Ok(command)
}

fn forbidden(sql: &str, reason: &'static str) -> QueryError {
    QueryError::Forbidden {
        keyword: leading_word(sql),
        reason,
    }
}

/// First whitespace-delimited word, lower-cased and capped for logging.
pub fn leading_word(sql: &str) -> String {
    sql.split_whitespace()
        .next()
        .unwrap_or_default()
        .chars()
        .take(32)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_forbidden(result: Result<Command>) -> bool {
        matches!(result, Err(QueryError::Forbidden { .. }))
    }

    #[test]
    fn test_allowed_commands_list() {
        assert_eq!(allowed_commands(), vec!["select", "pragma"]);
    }

    #[test]
    fn test_prefix_accepts_select_and_pragma_in_any_case() {
        let policy = QueryPolicy::default();
        assert_eq!(policy.classify("SELECT * FROM teams").unwrap(), Command::Select);
        assert_eq!(policy.classify("  select 1").unwrap(), Command::Select);
        assert_eq!(policy.classify("\n\tSeLeCt name FROM players").unwrap(), Command::Select);
        assert_eq!(policy.classify("PRAGMA table_info(teams)").unwrap(), Command::Pragma);
        assert_eq!(policy.classify("pragma foreign_keys").unwrap(), Command::Pragma);
    }

    #[test]
    fn test_prefix_rejects_mutating_and_admin_statements() {
        let policy = QueryPolicy::default();
        for sql in [
            "INSERT INTO teams (name) VALUES ('X')",
            "update players set runs = 0",
            "DELETE FROM players",
            "DROP TABLE teams",
            "ALTER TABLE teams ADD COLUMN x",
            "CREATE TABLE x (id INTEGER)",
            "ATTACH DATABASE 'other.db' AS other",
            "WITH t AS (SELECT 1) SELECT * FROM t",
            "",
        ] {
            assert!(is_forbidden(policy.classify(sql)), "{sql} should be rejected");
        }
    }

    #[test]
    fn test_prefix_is_a_literal_prefix_check() {
        let policy = QueryPolicy::default();
        // Accepted: only the leading characters are inspected.
        assert!(policy.classify("selectivity").is_ok());
        assert!(policy.classify("SELECT 1; DROP TABLE teams").is_ok());
        // Rejected: a leading comment hides the keyword.
        assert!(is_forbidden(policy.classify("/* hi */ SELECT 1")));
    }

    #[test]
    fn test_forbidden_reports_leading_keyword() {
        let err = QueryPolicy::default().classify("  DROP TABLE teams").unwrap_err();
        match err {
            QueryError::Forbidden { keyword, reason } => {
                assert_eq!(keyword, "drop");
                assert_eq!(reason, FORBIDDEN_MESSAGE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_strict_skips_leading_comments() {
        let policy = QueryPolicy::strict();
        assert_eq!(
            policy.classify("-- top scorers\nSELECT name FROM players").unwrap(),
            Command::Select
        );
        assert_eq!(
            policy.classify("/* schema */ PRAGMA table_info(teams)").unwrap(),
            Command::Pragma
        );
    }

    #[test]
    fn test_strict_requires_whole_keyword() {
        let policy = QueryPolicy::strict();
        assert!(is_forbidden(policy.classify("selectivity")));
        assert!(is_forbidden(policy.classify("/* SELECT */ DELETE FROM players")));
    }

    #[test]
    fn test_strict_rejects_stacked_statements() {
        let policy = QueryPolicy::strict();
        let err = policy.classify("SELECT 1; DROP TABLE teams").unwrap_err();
        assert!(matches!(
            err,
            QueryError::Forbidden { reason: MULTIPLE_STATEMENTS_MESSAGE, .. }
        ));
    }

    #[test]
    fn test_strict_allows_trailing_semicolons_and_comments() {
        let policy = QueryPolicy::strict();
        assert!(policy.classify("SELECT 1;").is_ok());
        assert!(policy.classify("SELECT 1; ;  -- done").is_ok());
        assert!(policy.classify("SELECT ';DROP TABLE teams' AS s").is_ok());
    }

    #[test]
    fn test_strict_rejects_unterminated_input() {
        let err = QueryPolicy::strict().classify("SELECT 'open").unwrap_err();
        assert!(matches!(err, QueryError::Forbidden { reason: UNREADABLE_MESSAGE, .. }));
    }
}
