pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod query;
pub mod storage;

pub use api::{router, AppState};
pub use config::{Config, RunMode};
pub use query::{QueryExecutor, QueryPolicy, SchemaIntrospector};
pub use storage::{Database, ResultSet, StorageEngine, Value};
