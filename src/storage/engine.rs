use async_trait::async_trait;

use super::error::Result;
use super::table::{ColumnInfo, ResultSet};

/// The storage operations the query console needs.
///
/// [`Database`](super::Database) is the production implementation; tests
/// provide doubles to observe or fail individual calls.
#[async_trait]
pub trait StorageEngine: Send + Sync {
    /// Runs one caller-supplied statement with no bound parameters.
    async fn execute(&self, sql: String) -> Result<ResultSet>;

    /// Names of user tables, excluding SQLite's internal `sqlite_*` tables.
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// Column metadata for one table, in declaration order.
    async fn table_columns(&self, table: String) -> Result<Vec<ColumnInfo>>;
}
