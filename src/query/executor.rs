use std::sync::Arc;

use tracing::{debug, warn};

use crate::storage::{ResultSet, StorageEngine};

use super::classifier::{Command, QueryPolicy};
use super::error::{QueryError, Result};

/// Longest statement echo returned to callers, in characters.
pub const ECHO_LIMIT: usize = 100;

/// Outcome of one accepted and executed statement.
#[derive(Debug, Clone)]
pub struct QueryOutput {
    pub command: Command,
    pub rows: ResultSet,
    /// The statement as submitted, cut to [`ECHO_LIMIT`] characters. For
    /// display only.
    pub echo: String,
}

impl QueryOutput {
    pub fn row_count(&self) -> usize {
        self.rows.row_count()
    }
}

/// Validates caller-supplied SQL against a [`QueryPolicy`] and runs it.
pub struct QueryExecutor {
    engine: Arc<dyn StorageEngine>,
    policy: QueryPolicy,
}

impl QueryExecutor {
    pub fn new(engine: Arc<dyn StorageEngine>, policy: QueryPolicy) -> Self {
        Self { engine, policy }
    }

    /// Runs `query` if the policy allows it.
    ///
    /// Missing or blank input and policy violations are reported before the
    /// storage engine is touched. The caller's text is executed unmodified.
    pub async fn execute(&self, query: Option<&str>) -> Result<QueryOutput> {
        let sql = match query {
            Some(sql) if !sql.trim().is_empty() => sql,
            _ => return Err(QueryError::Missing),
        };

        let command = self.policy.classify(sql).inspect_err(|err| {
            if let QueryError::Forbidden { keyword, reason } = err {
                warn!(%keyword, %reason, "query rejected by policy");
            }
        })?;

        let echo = echo_statement(sql);
        debug!(%command, query = %echo, "executing query");

        let rows = self
            .engine
            .execute(sql.to_string())
            .await
            .map_err(QueryError::from)
            .inspect_err(|err| warn!(query = %echo, error = %err, "query execution failed"))?;

        Ok(QueryOutput {
            command,
            rows,
            echo,
        })
    }
}

/// First [`ECHO_LIMIT`] characters of `sql`, with `...` appended when
/// anything was cut.
pub fn echo_statement(sql: &str) -> String {
    let mut chars = sql.char_indices();
    match chars.nth(ECHO_LIMIT) {
        None => sql.to_string(),
        Some((cut, _)) => format!("{}...", &sql[..cut]),
    }
}
