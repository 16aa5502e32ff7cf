//! The run orchestrator
//!
//! Sequences load → resolve → extract → normalize → write per file, over a
//! single named file or every eligible file in the data directory. Files
//! run strictly one after another; an error in one file is logged and
//! isolated so the rest of the run proceeds.

use crate::config::IngestConfig;
use crate::error::IngestError;
use crate::normalize::normalize;
use crate::report::{dump_unparsed, ARTIFACT_PREFIX};
use crate::strategy::Cascade;
use crate::types::{FileOutcome, FileReport, RunSummary, SourceDocument};
use crate::writer::BatchWriter;
use flexion_domain::traits::CatalogStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// The catalog ingestion pipeline
///
/// Holds the store handle, constructed once by the caller and threaded into
/// every write; nothing here owns global state.
pub struct Pipeline<S: CatalogStore> {
    store: S,
    config: IngestConfig,
    cascade: Cascade,
    writer: BatchWriter,
}

impl<S: CatalogStore> Pipeline<S> {
    /// Create a pipeline over a ready-to-use store handle
    pub fn new(store: S, config: IngestConfig) -> Self {
        let writer = BatchWriter::new(config.batch_limit);
        Self {
            store,
            config,
            cascade: Cascade::default(),
            writer,
        }
    }

    /// Replace the extraction cascade (mainly for tests)
    pub fn with_cascade(mut self, cascade: Cascade) -> Self {
        self.cascade = cascade;
        self
    }

    /// Run the pipeline: one file when a path is given, otherwise every
    /// eligible file in the data directory
    pub async fn run(&self, target: Option<&Path>) -> Result<RunSummary, IngestError> {
        match target {
            Some(path) => {
                let report = self.run_file(path).await?;
                let mut summary = RunSummary::default();
                summary.absorb(&report);
                Ok(summary)
            }
            None => self.run_dir().await,
        }
    }

    /// Ingest one source file
    pub async fn run_file(&self, path: &Path) -> Result<FileReport, IngestError> {
        let source = SourceDocument::load(path)?;
        info!(
            "Processing {} into category '{}'",
            path.display(),
            source.category
        );

        let raw_records = self.cascade.extract(&source.text);
        if raw_records.is_empty() {
            warn!("No strategy extracted records from {}", path.display());
            let artifact = dump_unparsed(&source.path, &source.text);
            return Ok(FileReport {
                path: source.path,
                category: source.category,
                outcome: FileOutcome::Unparsed { artifact },
            });
        }

        let extracted = raw_records.len();
        let mut records = Vec::with_capacity(extracted);
        for (index, raw) in raw_records.iter().enumerate() {
            match normalize(raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Dropping record {} of {}: {}",
                    index + 1,
                    path.display(),
                    e
                ),
            }
        }
        let dropped = extracted - records.len();

        let stats = self
            .writer
            .write(&self.store, &source.category, &records)
            .await?;

        info!(
            "Ingested {} records into '{}' in {} commits ({} dropped)",
            stats.records, source.category, stats.commits, dropped
        );

        Ok(FileReport {
            path: source.path,
            category: source.category,
            outcome: FileOutcome::Ingested {
                extracted,
                dropped,
                stats,
            },
        })
    }

    /// Ingest every eligible file in the data directory, strictly in order
    pub async fn run_dir(&self) -> Result<RunSummary, IngestError> {
        let files = self.eligible_files()?;
        info!(
            "Processing {} source files from {}",
            files.len(),
            self.config.data_dir.display()
        );

        let mut summary = RunSummary::default();
        for path in files {
            match self.run_file(&path).await {
                Ok(report) => summary.absorb(&report),
                Err(e) => {
                    error!("Failed to ingest {}: {}", path.display(), e);
                    summary.record_failure();
                }
            }
        }

        info!("Run complete: {}", summary);
        Ok(summary)
    }

    /// Source files under the data directory, sorted for determinism.
    /// Debug artifacts and module barrels are not data.
    fn eligible_files(&self) -> Result<Vec<PathBuf>, IngestError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.config.data_dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if name.starts_with(ARTIFACT_PREFIX) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem == "index" {
                continue;
            }
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !self.config.source_extensions.iter().any(|e| e == ext) {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexion_store::MemoryStore;
    use std::fs;

    fn pipeline_at(dir: &Path) -> Pipeline<MemoryStore> {
        let config = IngestConfig {
            data_dir: dir.to_path_buf(),
            ..IngestConfig::default()
        };
        Pipeline::new(MemoryStore::new(), config)
    }

    #[test]
    fn test_eligible_files_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "backExercises.ts",
            "armExercises.ts",
            "index.ts",
            "failed-legExercises.ts",
            "notes.txt",
        ] {
            fs::write(dir.path().join(name), "export const x = [];").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();

        let files = pipeline_at(dir.path()).eligible_files().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, vec!["armExercises.ts", "backExercises.ts"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_at(dir.path());
        let result = pipeline.run_file(&dir.path().join("ghost.ts")).await;
        assert!(matches!(result, Err(IngestError::Io(_))));
    }
}
