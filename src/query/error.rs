use thiserror::Error;

use crate::storage::StorageError;

pub const FORBIDDEN_MESSAGE: &str =
    "Only SELECT queries and PRAGMA commands are allowed for security reasons";
pub const MULTIPLE_STATEMENTS_MESSAGE: &str = "Only a single statement is allowed per query";
pub const UNREADABLE_MESSAGE: &str = "Query could not be tokenized";

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Query is required")]
    Missing,

    /// The statement is not on the allow-list. `keyword` is the lower-cased
    /// leading word, kept for logging.
    #[error("{reason}")]
    Forbidden {
        keyword: String,
        reason: &'static str,
    },

    /// SQLite rejected an allowed statement; carries the engine's message.
    #[error("Query execution failed: {0}")]
    Execution(String),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for QueryError {
    fn from(err: StorageError) -> Self {
        if err.is_statement_error() {
            QueryError::Execution(err.to_string())
        } else {
            QueryError::Storage(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
