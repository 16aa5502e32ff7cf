//! Size-bounded, strictly sequential batch writes
//!
//! Records are written in order as whole-document replaces, grouped into
//! commits of at most the configured limit. Each commit blocks until the
//! store acknowledges it before the next one opens; a failed commit is
//! fatal for the file, but commits already acknowledged stay persisted.

use crate::error::IngestError;
use crate::types::WriteStats;
use flexion_domain::traits::{CatalogStore, WriteBatch};
use flexion_domain::{CategoryKey, Record};
use tracing::debug;

/// Writes record batches against a `CatalogStore`
pub struct BatchWriter {
    limit: usize,
}

impl BatchWriter {
    /// Create a writer committing at most `limit` operations per batch
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    /// Write every record under `category/id`, in order
    ///
    /// For `N` records and limit `L` this issues exactly `ceil(N/L)` commits
    /// of sizes `L, L, ..., N mod L` (or `L` when `N` divides evenly).
    pub async fn write<S: CatalogStore>(
        &self,
        store: &S,
        category: &CategoryKey,
        records: &[Record],
    ) -> Result<WriteStats, IngestError> {
        let mut stats = WriteStats::default();
        let mut batch = store.batch();

        for record in records {
            let document = serde_json::to_value(record)?;
            batch.set(category, &record.id, document);

            if batch.len() >= self.limit {
                stats.records += commit(batch, &mut stats.commits).await?;
                batch = store.batch();
            }
        }

        if !batch.is_empty() {
            stats.records += commit(batch, &mut stats.commits).await?;
        }

        Ok(stats)
    }
}

async fn commit<B: WriteBatch>(batch: B, commits: &mut usize) -> Result<usize, IngestError> {
    let size = batch.len();
    let committed = batch
        .commit()
        .await
        .map_err(|e| IngestError::Store(e.to_string()))?;
    *commits += 1;
    debug!("Committed batch #{} of {} operations", commits, size);
    Ok(committed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexion_store::MemoryStore;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record::new(format!("record-{:04}", i), format!("Record {}", i)))
            .collect()
    }

    fn category(name: &str) -> CategoryKey {
        CategoryKey::new(name).unwrap()
    }

    #[tokio::test]
    async fn test_batch_sizing() {
        let store = MemoryStore::new();
        let writer = BatchWriter::new(400);

        let stats = writer
            .write(&store, &category("chest"), &records(1000))
            .await
            .unwrap();

        assert_eq!(stats.records, 1000);
        assert_eq!(stats.commits, 3);
        assert_eq!(store.commit_sizes(), vec![400, 400, 200]);
    }

    #[tokio::test]
    async fn test_exact_multiple_has_no_remainder_commit() {
        let store = MemoryStore::new();
        let writer = BatchWriter::new(50);

        let stats = writer
            .write(&store, &category("back"), &records(100))
            .await
            .unwrap();

        assert_eq!(stats.commits, 2);
        assert_eq!(store.commit_sizes(), vec![50, 50]);
    }

    #[tokio::test]
    async fn test_empty_input_commits_nothing() {
        let store = MemoryStore::new();
        let writer = BatchWriter::new(400);

        let stats = writer
            .write(&store, &category("legs"), &[])
            .await
            .unwrap();

        assert_eq!(stats.commits, 0);
        assert!(store.commit_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_commit_failure_keeps_earlier_batches() {
        let store = MemoryStore::new().fail_after_commits(1);
        let writer = BatchWriter::new(400);

        let result = writer
            .write(&store, &category("arms"), &records(500))
            .await;

        assert!(matches!(result, Err(IngestError::Store(_))));
        // the first 400 stay persisted; no rollback across batches
        assert_eq!(store.len(), 400);
    }

    #[tokio::test]
    async fn test_records_written_in_order() {
        let store = MemoryStore::new();
        let writer = BatchWriter::new(3);
        let cat = category("core");

        writer.write(&store, &cat, &records(7)).await.unwrap();

        assert_eq!(store.commit_sizes(), vec![3, 3, 1]);
        let ids = store.ids(&cat);
        assert_eq!(ids.first().map(String::as_str), Some("record-0000"));
        assert_eq!(ids.last().map(String::as_str), Some("record-0006"));
    }
}
