//! Flexion Ingestion Pipeline
//!
//! Converts loosely structured, scraper-authored catalog source files into
//! validated records published into a hierarchical document store.
//!
//! # Overview
//!
//! Source files hold one category's worth of records in object-literal
//! notation, with heterogeneous authoring conventions (unquoted keys, single
//! quotes, template strings). The pipeline tolerates that drift: a cascade of
//! extraction strategies is tried in fixed order until one yields records,
//! the normalizer turns the open key/value result into typed records, and a
//! batch writer publishes them in provider-sized commits. A file that defeats
//! every strategy is dumped to a debug artifact and the run moves on.
//!
//! # Architecture
//!
//! ```text
//! Source file → Metadata Resolver → Extraction Cascade → Normalizer
//!                                                            ↓
//!                      Debug artifact ← (total failure)  Batch Writer → Store
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use flexion_ingest::{IngestConfig, Pipeline};
//! use flexion_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IngestConfig::default();
//! let store = SqliteStore::open(&config.store_path)?;
//!
//! let pipeline = Pipeline::new(store, config);
//! let summary = pipeline.run(None).await?;
//!
//! println!("{}", summary);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod jsonify;
mod literal;
mod metadata;
mod normalize;
mod pipeline;
mod report;
mod strategy;
mod types;
mod writer;

pub use config::IngestConfig;
pub use error::IngestError;
pub use metadata::resolve_category;
pub use normalize::{normalize, ShapeError};
pub use pipeline::Pipeline;
pub use report::{dump_unparsed, ARTIFACT_PREFIX};
pub use strategy::{
    Cascade, CollectionParse, ExtractionStrategy, RelaxedBlockScan, StrictBlockScan,
};
pub use types::{FileOutcome, FileReport, RunSummary, SourceDocument, WriteStats};
pub use writer::BatchWriter;
