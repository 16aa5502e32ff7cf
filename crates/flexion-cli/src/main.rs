//! Flexion CLI - ingest catalog source files into the document store.

use clap::Parser;
use flexion_cli::{load_config, Cli, Result};
use flexion_ingest::{IngestConfig, Pipeline};
use flexion_store::SqliteStore;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Anything failing before the first file is a configuration problem
    // and aborts the whole run
    let (config, store) = match setup(&cli) {
        Ok(ready) => ready,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let pipeline = Pipeline::new(store, config);
    match pipeline.run(cli.file.as_deref()).await {
        Ok(summary) => println!("{}", summary),
        // per-file failures are logged, not escalated into the exit code
        Err(e) => error!("Ingestion failed: {}", e),
    }
}

fn setup(cli: &Cli) -> Result<(IngestConfig, SqliteStore)> {
    let config = load_config(cli.config.as_deref())?;
    let store = SqliteStore::open(&config.store_path)?;
    Ok((config, store))
}
