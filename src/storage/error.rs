use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    Poisoned,

    #[error("Blocking database task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StorageError {
    /// True when SQLite refused the statement because of a UNIQUE, NOT NULL,
    /// CHECK or FOREIGN KEY constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
        )
    }

    /// Failures caused by the statement itself rather than by the
    /// connection or the runtime.
    pub fn is_statement_error(&self) -> bool {
        matches!(self, StorageError::Sqlite(_))
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;
