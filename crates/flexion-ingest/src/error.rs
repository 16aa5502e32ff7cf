//! Error types for the ingestion pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while ingesting a source file
///
/// Every variant is fatal for the file it occurred in and no further; the
/// orchestrator isolates it and continues with the next file. Only the
/// caller's configuration layer may abort a whole run.
#[derive(Error, Debug)]
pub enum IngestError {
    /// I/O error reading a source file or scanning the data directory
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No heuristic produced a category key for the file
    #[error("Could not resolve a category key for {}", path.display())]
    MetadataResolution {
        /// The source file the resolver gave up on
        path: PathBuf,
    },

    /// A record could not be encoded into a store document
    #[error("Record encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The store refused a commit
    #[error("Store error: {0}")]
    Store(String),
}
