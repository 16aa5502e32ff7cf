//! Flexion CLI - command-line entry point for the catalog ingestion
//! pipeline.

pub mod cli;
pub mod config;
pub mod error;

pub use cli::Cli;
pub use config::{load_config, DEFAULT_CONFIG_FILE};
pub use error::{CliError, Result};
