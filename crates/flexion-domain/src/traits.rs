//! Trait definitions for the document-store seam
//!
//! These traits define the boundary between the pipeline and the target
//! store. Infrastructure implementations live in other crates; the pipeline
//! only ever sees a `CatalogStore` handle constructed once by the caller and
//! threaded through as a parameter.

use crate::CategoryKey;
use serde_json::Value;
use std::fmt::Display;

/// The hard cap the store provider imposes on operations per commit.
///
/// Writers must stay under this with a safety margin; implementations reject
/// any commit that exceeds it.
pub const PROVIDER_BATCH_CAP: usize = 500;

/// A hierarchical document store addressed by `category/id`
///
/// Implemented by the infrastructure layer (flexion-store). The handle is
/// assumed to be ready to use; credential acquisition happens before the
/// pipeline ever sees it.
pub trait CatalogStore {
    /// Error type for store operations
    type Error: Display;

    /// Batch type produced by this store
    type Batch: WriteBatch<Error = Self::Error>;

    /// Open a new, empty write batch
    fn batch(&self) -> Self::Batch;
}

/// An ordered, size-bounded group of writes committed together
///
/// Batches carry no cross-batch atomicity: a failed commit never rolls back
/// batches committed earlier.
#[allow(async_fn_in_trait)]
pub trait WriteBatch {
    /// Error type for commit failures
    type Error: Display;

    /// Queue a whole-document replace of `category/id`
    fn set(&mut self, category: &CategoryKey, id: &str, document: Value);

    /// Number of operations queued so far
    fn len(&self) -> usize;

    /// Whether the batch holds no operations
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Commit every queued operation, blocking until the store acknowledges.
    ///
    /// Returns the number of operations committed.
    async fn commit(self) -> Result<usize, Self::Error>;
}
