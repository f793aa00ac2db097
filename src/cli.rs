use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

use crate::config::RunMode;

#[derive(Parser, Debug)]
#[command(name = "ipldb")]
#[command(author, version, about = "Cricket statistics API with a read-only SQL query console")]
pub struct Cli {
    /// SQLite database file (created and seeded on first start)
    #[arg(long, env = "IPLDB_DATABASE", default_value = "ipl_database.db", global = true)]
    pub db: PathBuf,

    /// Whether error responses include internal details
    #[arg(long, env = "IPLDB_ENV", value_enum, default_value = "production", global = true)]
    pub mode: RunMode,

    /// Tokenize console queries: skip leading comments, require a whole
    /// keyword and refuse stacked statements
    #[arg(long, env = "IPLDB_STRICT_QUERIES", global = true)]
    pub strict_queries: bool,

    /// Do not insert the sample teams and players into an empty database
    #[arg(long, global = true)]
    pub no_seed: bool,

    /// Address the HTTP server binds to
    #[arg(long, default_value = "0.0.0.0", global = true)]
    pub host: IpAddr,

    /// Port the HTTP server listens on
    #[arg(long, env = "PORT", default_value_t = 3000, global = true)]
    pub port: u16,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP API (the default)
    Serve,

    /// Run one statement through the query console policy and print it
    Query {
        /// The SQL statement, e.g. "SELECT name FROM teams"
        sql: String,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Print every table with its columns as JSON
    Schema,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
