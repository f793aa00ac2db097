use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use tracing::info;

use super::engine::StorageEngine;
use super::error::{Result, StorageError};
use super::seed;
use super::table::{ColumnInfo, ResultSet, Row, Value};

const CREATE_TEAMS: &str = "
    CREATE TABLE IF NOT EXISTS teams (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        wins INTEGER DEFAULT 0,
        losses INTEGER DEFAULT 0,
        trophies TEXT DEFAULT NULL
    )";

const CREATE_PLAYERS: &str = "
    CREATE TABLE IF NOT EXISTS players (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        role TEXT NOT NULL,
        team_id INTEGER,
        runs INTEGER DEFAULT 0,
        wickets INTEGER DEFAULT 0,
        image_url TEXT,
        FOREIGN KEY (team_id) REFERENCES teams(id)
    )";

/// Shared handle to the SQLite database.
///
/// Created once at startup and cloned into every consumer. All access goes
/// through one connection guarded by a mutex; async callers hop onto the
/// blocking pool via [`Database::call`].
#[derive(Debug, Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened SQLite database");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Creates the `teams` and `players` tables when missing and, if
    /// `seed` is set, fills empty tables with the sample data.
    pub fn initialize(&self, seed: bool) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(CREATE_TEAMS)?;
            conn.execute_batch(CREATE_PLAYERS)?;
            info!("tables ensured");

            if seed {
                seed::seed_if_empty(conn)?;
            }
            Ok(())
        })
    }

    /// Runs `f` against the connection on the current thread.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut guard = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        f(&mut guard)
    }

    /// Runs `f` against the connection on the blocking thread pool.
    pub async fn call<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || db.with_conn(f)).await?
    }
}

#[async_trait]
impl StorageEngine for Database {
    async fn execute(&self, sql: String) -> Result<ResultSet> {
        self.call(move |conn| read_result_set(conn, &sql)).await
    }

    async fn list_tables(&self) -> Result<Vec<String>> {
        self.call(|conn| list_tables(conn)).await
    }

    async fn table_columns(&self, table: String) -> Result<Vec<ColumnInfo>> {
        self.call(move |conn| table_columns(conn, &table)).await
    }
}

/// Prepares `sql` as-is, with no bound parameters, and collects every row.
pub fn read_result_set(conn: &Connection, sql: &str) -> Result<ResultSet> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let column_count = columns.len();

    let mut result = ResultSet::new(columns);
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let values = (0..column_count)
            .map(|i| row.get_ref(i).map(Value::from))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        result.add_row(Row::new(values));
    }

    Ok(result)
}

pub fn list_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )?;

    let tables = stmt
        .query_map([], |row| row.get(0))?
        .collect::<std::result::Result<Vec<String>, _>>()?;

    Ok(tables)
}

pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_identifier(table)))?;

    let columns = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let declared_type: String = row.get(2)?;
            // Position within the primary key, 0 when not part of it.
            let pk: i64 = row.get(5)?;
            Ok(ColumnInfo::new(name, declared_type, pk > 0))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(columns)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.initialize(false).unwrap();
        db
    }

    #[test]
    fn test_initialize_creates_tables() {
        let db = empty_db();
        let tables = db.with_conn(|conn| list_tables(conn)).unwrap();
        assert_eq!(tables, vec!["players".to_string(), "teams".to_string()]);
    }

    #[test]
    fn test_table_columns_reports_primary_key() {
        let db = empty_db();
        let columns = db.with_conn(|conn| table_columns(conn, "teams")).unwrap();

        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "wins", "losses", "trophies"]);
        assert!(columns[0].pk);
        assert!(columns[1..].iter().all(|c| !c.pk));
        assert_eq!(columns[0].declared_type, "INTEGER");
    }

    #[test]
    fn test_composite_primary_key_marks_every_member() {
        let db = empty_db();
        let columns = db
            .with_conn(|conn| {
                conn.execute_batch("CREATE TABLE fixtures (season INTEGER, match_no INTEGER, venue TEXT, PRIMARY KEY (season, match_no))")?;
                table_columns(conn, "fixtures")
            })
            .unwrap();

        let pk: Vec<bool> = columns.iter().map(|c| c.pk).collect();
        assert_eq!(pk, vec![true, true, false]);
    }

    #[test]
    fn test_quote_identifier_escapes_quotes() {
        assert_eq!(quote_identifier("teams"), "\"teams\"");
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_read_result_set_keeps_column_order() {
        let db = empty_db();
        let result = db
            .with_conn(|conn| read_result_set(conn, "SELECT 1 AS one, 'two' AS two, NULL AS three"))
            .unwrap();

        assert_eq!(result.columns, vec!["one", "two", "three"]);
        assert_eq!(result.row_count(), 1);
        assert_eq!(result.rows[0].values[0], Value::Integer(1));
        assert_eq!(result.rows[0].values[1], Value::Text("two".to_string()));
        assert!(result.rows[0].values[2].is_null());
    }

    #[tokio::test]
    async fn test_engine_execute_surfaces_sqlite_message() {
        let db = empty_db();
        let err = db
            .execute("SELECT * FROM nonexistent_table".to_string())
            .await
            .unwrap_err();

        assert!(err.is_statement_error());
        assert!(err.to_string().contains("no such table"));
    }
}
