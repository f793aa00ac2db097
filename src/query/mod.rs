pub mod catalog;
pub mod classifier;
pub mod error;
pub mod executor;
pub mod introspect;
pub mod lexer;

#[cfg(test)]
mod test_support;

pub use classifier::{allowed_commands, Command, PolicyMode, QueryPolicy};
pub use error::{QueryError, Result};
pub use executor::{echo_statement, QueryExecutor, QueryOutput, ECHO_LIMIT};
pub use introspect::{SchemaDescriptor, SchemaIntrospector};
