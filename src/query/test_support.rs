//! In-memory [`StorageEngine`] double for the query unit tests.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::storage::{ColumnInfo, ResultSet, Row, StorageEngine, StorageError, Value};

pub fn sqlite_failure(message: &str) -> StorageError {
    StorageError::Sqlite(rusqlite::Error::SqliteFailure(
        rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_ERROR),
        Some(message.to_string()),
    ))
}

#[derive(Default)]
pub struct RecordingEngine {
    result: ResultSet,
    failure: Option<String>,
    tables: BTreeMap<String, Vec<ColumnInfo>>,
    failing_table: Option<String>,
    executed: Mutex<Vec<String>>,
    execute_calls: AtomicUsize,
    column_calls: AtomicUsize,
}

impl RecordingEngine {
    pub fn with_rows(columns: Vec<&str>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            result: ResultSet::with_rows(
                columns.into_iter().map(String::from).collect(),
                rows.into_iter().map(Row::new).collect(),
            ),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_table(mut self, name: &str, columns: Vec<ColumnInfo>) -> Self {
        self.tables.insert(name.to_string(), columns);
        self
    }

    pub fn failing_on_table(mut self, name: &str) -> Self {
        self.failing_table = Some(name.to_string());
        self
    }

    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }

    pub fn column_calls(&self) -> usize {
        self.column_calls.load(Ordering::SeqCst)
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl StorageEngine for RecordingEngine {
    async fn execute(&self, sql: String) -> crate::storage::Result<ResultSet> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql);
        }
        match &self.failure {
            Some(message) => Err(sqlite_failure(message)),
            None => Ok(self.result.clone()),
        }
    }

    async fn list_tables(&self) -> crate::storage::Result<Vec<String>> {
        if let Some(message) = &self.failure {
            return Err(sqlite_failure(message));
        }
        Ok(self.tables.keys().cloned().collect())
    }

    async fn table_columns(&self, table: String) -> crate::storage::Result<Vec<ColumnInfo>> {
        self.column_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_table.as_deref() == Some(table.as_str()) {
            return Err(sqlite_failure(&format!("cannot read table {}", table)));
        }
        Ok(self.tables.get(&table).cloned().unwrap_or_default())
    }
}
