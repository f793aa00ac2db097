pub mod engine;
pub mod error;
pub mod seed;
pub mod sqlite;
pub mod table;

pub use engine::StorageEngine;
pub use error::{Result, StorageError};
pub use sqlite::Database;
pub use table::{ColumnInfo, ResultSet, Row, Value};
