use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::debug;

use crate::storage::{ColumnInfo, Result, StorageEngine, StorageError};

/// Live table name to column list mapping, rebuilt on every request.
pub type SchemaDescriptor = BTreeMap<String, Vec<ColumnInfo>>;

/// Enumerates the user tables of a [`StorageEngine`] and their columns.
pub struct SchemaIntrospector {
    engine: Arc<dyn StorageEngine>,
}

impl SchemaIntrospector {
    pub fn new(engine: Arc<dyn StorageEngine>) -> Self {
        Self { engine }
    }

    /// Lists the tables, then fetches every table's columns concurrently and
    /// waits for all of them.
    ///
    /// Either every table appears with its full column list or the first
    /// failure is returned and the remaining lookups are aborted.
    pub async fn describe(&self) -> Result<SchemaDescriptor> {
        let tables = self.engine.list_tables().await?;
        let mut schema = SchemaDescriptor::new();
        if tables.is_empty() {
            return Ok(schema);
        }

        let mut lookups = JoinSet::new();
        for table in tables {
            let engine = Arc::clone(&self.engine);
            lookups.spawn(async move {
                let columns = engine.table_columns(table.clone()).await?;
                Ok::<_, StorageError>((table, columns))
            });
        }

        while let Some(joined) = lookups.join_next().await {
            let (table, columns) = joined??;
            schema.insert(table, columns);
        }

        debug!(tables = schema.len(), "schema introspected");
        Ok(schema)
    }
}
