//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

/// Flexion - ingest catalog source files into the document store.
#[derive(Debug, Parser)]
#[command(name = "flexion")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Source file to ingest; omit to ingest every eligible file in the
    /// configured data directory
    pub file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
