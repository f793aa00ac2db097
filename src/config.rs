use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::query::{PolicyMode, QueryPolicy};

/// Controls whether internal error details reach HTTP clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RunMode {
    Development,
    #[default]
    Production,
}

impl RunMode {
    pub fn exposes_error_detail(self) -> bool {
        self == RunMode::Development
    }
}

/// Runtime settings, assembled once from the command line and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub mode: RunMode,
    pub policy: QueryPolicy,
    pub seed: bool,
    pub bind: SocketAddr,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        let policy_mode = if cli.strict_queries {
            PolicyMode::Strict
        } else {
            PolicyMode::Prefix
        };

        Self {
            db_path: cli.db.clone(),
            mode: cli.mode,
            policy: QueryPolicy::new(policy_mode),
            seed: !cli.no_seed,
            bind: SocketAddr::new(cli.host, cli.port),
        }
    }
}
