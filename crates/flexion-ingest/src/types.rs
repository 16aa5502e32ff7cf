//! Source, report, and summary types for the pipeline

use crate::error::IngestError;
use crate::metadata::resolve_category;
use flexion_domain::CategoryKey;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One source file, loaded and attributed to its category
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Where the file came from
    pub path: PathBuf,

    /// Raw file contents
    pub text: String,

    /// Resolved collection name, lower-cased for storage
    pub category: CategoryKey,
}

impl SourceDocument {
    /// Read a source file and resolve its category key
    pub fn load(path: &Path) -> Result<Self, IngestError> {
        let text = fs::read_to_string(path)?;
        let category = resolve_category(&text, path)?;
        Ok(Self {
            path: path.to_path_buf(),
            text,
            category,
        })
    }
}

/// Counts from one batch-write pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    /// Records written
    pub records: usize,

    /// Commits acknowledged
    pub commits: usize,
}

/// Outcome of processing one source file
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Records were extracted and written
    Ingested {
        /// Raw records the cascade produced
        extracted: usize,

        /// Records dropped by the normalizer
        dropped: usize,

        /// What the batch writer committed
        stats: WriteStats,
    },

    /// Every extraction strategy came up empty
    Unparsed {
        /// Debug artifact location, when it could be written
        artifact: Option<PathBuf>,
    },
}

/// Per-file report emitted by the orchestrator
#[derive(Debug, Clone)]
pub struct FileReport {
    /// The source file
    pub path: PathBuf,

    /// The category it resolved to
    pub category: CategoryKey,

    /// What happened
    pub outcome: FileOutcome,
}

/// Aggregate of one pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files whose records reached the store
    pub files_ingested: usize,

    /// Files that defeated every extraction strategy
    pub files_unparsed: usize,

    /// Files aborted by an error
    pub files_failed: usize,

    /// Records written across all files
    pub records_written: usize,

    /// Records dropped by the normalizer across all files
    pub records_dropped: usize,

    /// Commits acknowledged across all files
    pub commits: usize,
}

impl RunSummary {
    /// Fold one file report into the tally
    pub fn absorb(&mut self, report: &FileReport) {
        match &report.outcome {
            FileOutcome::Ingested { dropped, stats, .. } => {
                self.files_ingested += 1;
                self.records_written += stats.records;
                self.records_dropped += dropped;
                self.commits += stats.commits;
            }
            FileOutcome::Unparsed { .. } => {
                self.files_unparsed += 1;
            }
        }
    }

    /// Count one file that aborted with an error
    pub fn record_failure(&mut self) {
        self.files_failed += 1;
    }

    /// Total files the run touched
    pub fn files_processed(&self) -> usize {
        self.files_ingested + self.files_unparsed + self.files_failed
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files ingested, {} unparsed, {} failed; {} records in {} commits ({} dropped)",
            self.files_ingested,
            self.files_unparsed,
            self.files_failed,
            self.records_written,
            self.commits,
            self.records_dropped,
        )
    }
}
