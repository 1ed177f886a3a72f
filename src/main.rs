use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use health_ingest::config::IngestConfig;
use health_ingest::credentials::load_credentials;
use health_ingest::db_postgres::{ingest_payload_sync, init_schema_sync, SyncDbPg};
use health_ingest::memory_store::MemoryStore;
use health_ingest::payload::RootPayload;
use health_ingest::serve::serve_ingest;
use health_ingest::{IngestError, IngestSummary};

#[derive(Parser, Debug)]
#[command(author, version, about = "Ingest wearable health metrics into PostgreSQL silver tables")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the ingest API (POST /health_metric)
    Serve {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,

        /// Port to listen on (overrides config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Load a single JSON payload file, as if it had been posted
    Load {
        /// Path to config file (TOML format), required unless --dry-run
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Payload file in the POST /health_metric format
        file: PathBuf,

        /// Run against an in-memory store and only report what would be written
        #[arg(long)]
        dry_run: bool,
    },
    /// Create the silver tables and partitioned parents if they do not exist
    InitSchema {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Serve { config, port } => serve(&config, port),
        Command::Load {
            config,
            file,
            dry_run,
        } => load(config.as_deref(), &file, dry_run),
        Command::InitSchema { config } => init_schema(&config),
    }
}

fn serve(config_path: &Path, port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = IngestConfig::load(config_path)?;
    if let Some(port) = port_override {
        config.api_port = port;
    }
    let password = config.database.resolve_password(&load_credentials()?)?;
    serve_ingest(config, password)
}

fn connect(config_path: &Path) -> Result<(IngestConfig, SyncDbPg), IngestError> {
    let config = IngestConfig::load(config_path)?;
    let password = config.database.resolve_password(&load_credentials()?)?;
    let db = SyncDbPg::connect(&config.database, &password)?;
    Ok((config, db))
}

fn load(
    config_path: Option<&Path>,
    file: &Path,
    dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read payload file '{}': {}", file.display(), e))?;
    let payload: RootPayload = serde_json::from_str(&content).map_err(|e| {
        IngestError::Validation(format!("Invalid payload in '{}': {}", file.display(), e))
    })?;

    let summary = if dry_run {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let mut store = MemoryStore::new();
        runtime.block_on(store.ingest(&payload))?
    } else {
        let config_path = config_path.ok_or("--config is required unless --dry-run is given")?;
        let (config, db) = connect(config_path)?;
        ingest_payload_sync(&db, &payload, config.database.statement_timeout_ms)?
    };

    print_summary(&summary, dry_run)?;
    Ok(())
}

fn print_summary(summary: &IngestSummary, dry_run: bool) -> Result<(), serde_json::Error> {
    if dry_run {
        println!("Dry run, nothing was written:");
    }
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn init_schema(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (config, db) = connect(config_path)?;
    init_schema_sync(&db)?;
    info!("Schema ready in database '{}'", config.database.database);
    Ok(())
}
