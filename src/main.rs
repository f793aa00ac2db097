use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipldb::cli::{Cli, Command, OutputFormat};
use ipldb::{router, AppState, Config, Database, QueryExecutor, ResultSet, SchemaIntrospector, StorageEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ipldb=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    let config = Config::from_cli(&cli);

    let db = Database::open(&config.db_path)?;
    db.initialize(config.seed)?;

    match cli.command {
        None | Some(Command::Serve) => serve(db, &config).await?,
        Some(Command::Query { sql, format }) => run_query(db, &config, &sql, format).await?,
        Some(Command::Schema) => print_schema(db).await?,
    }

    Ok(())
}

async fn serve(db: Database, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(db, config.policy);
    let app = router(state, config.mode);

    let listener = TcpListener::bind(config.bind).await?;
    info!(addr = %listener.local_addr()?, mode = ?config.mode, policy = ?config.policy.mode(), "IPLDB API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

async fn run_query(
    db: Database,
    config: &Config,
    query: &str,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine: Arc<dyn StorageEngine> = Arc::new(db);
    let executor = QueryExecutor::new(engine, config.policy);
    let output = executor.execute(Some(query)).await?;

    match format {
        OutputFormat::Table => print_table(&output.rows),
        OutputFormat::Csv => print_csv(&output.rows),
        OutputFormat::Json => println!("{}", serde_json::to_string(&output.rows)?),
    }

    Ok(())
}

async fn print_schema(db: Database) -> Result<(), Box<dyn std::error::Error>> {
    let schema = SchemaIntrospector::new(Arc::new(db)).describe().await?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn print_table(result: &ResultSet) {
    if result.row_count() == 0 {
        println!("(0 rows)");
        return;
    }

    // Calculate column widths
    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let max_value_width = result
                .rows
                .iter()
                .map(|row| row.get(i).map(|v| v.to_string().chars().count()).unwrap_or(0))
                .max()
                .unwrap_or(0);
            name.chars().count().max(max_value_width)
        })
        .collect();

    let header: Vec<String> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{:width$}", name, width = widths[i]))
        .collect();
    println!("{}", header.join(" | "));

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("-+-"));

    for row in &result.rows {
        let values: Vec<String> = row
            .values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                if v.is_numeric() {
                    format!("{:>width$}", v.to_string(), width = widths[i])
                } else {
                    format!("{:width$}", v.to_string(), width = widths[i])
                }
            })
            .collect();
        println!("{}", values.join(" | "));
    }

    println!("({} rows)", result.row_count());
}

fn print_csv(result: &ResultSet) {
    println!("{}", result.columns.join(","));

    for row in &result.rows {
        let values: Vec<String> = row
            .values
            .iter()
            .map(|v| {
                if v.is_null() {
                    return String::new();
                }
                let s = v.to_string();
                if s.contains(',') || s.contains('"') || s.contains('\n') {
                    format!("\"{}\"", s.replace('"', "\"\""))
                } else {
                    s
                }
            })
            .collect();
        println!("{}", values.join(","));
    }
}
