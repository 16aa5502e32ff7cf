//! In-memory store double for deterministic tests
//!
//! Mirrors the document semantics of the SQLite store without touching disk,
//! and keeps a ledger of the size of every commit it acknowledged so tests
//! can assert on batching behavior. Commits can be made to fail on demand.

use crate::StoreError;
use flexion_domain::traits::{CatalogStore, WriteBatch, PROVIDER_BATCH_CAP};
use flexion_domain::CategoryKey;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MemoryInner {
    docs: BTreeMap<(String, String), Value>,
    commit_sizes: Vec<usize>,
    fail_after: Option<usize>,
}

/// In-memory implementation of `CatalogStore`
///
/// # Examples
///
/// ```
/// use flexion_store::MemoryStore;
/// use flexion_domain::traits::{CatalogStore, WriteBatch};
/// use flexion_domain::CategoryKey;
///
/// # async fn example() {
/// let store = MemoryStore::new();
/// let chest = CategoryKey::new("chest").unwrap();
///
/// let mut batch = store.batch();
/// batch.set(&chest, "push-up", serde_json::json!({"name": "Push Up"}));
/// batch.commit().await.unwrap();
///
/// assert_eq!(store.commit_sizes(), vec![1]);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every commit after the first `n` successful ones fail
    pub fn fail_after_commits(self, n: usize) -> Self {
        {
            let mut inner = self.inner.lock().expect("memory store lock");
            inner.fail_after = Some(n);
        }
        self
    }

    /// Fetch one document, or `None` if it was never written
    pub fn get(&self, category: &CategoryKey, id: &str) -> Option<Value> {
        let inner = self.inner.lock().expect("memory store lock");
        inner
            .docs
            .get(&(category.as_str().to_string(), id.to_string()))
            .cloned()
    }

    /// Document ids stored under a category, sorted
    pub fn ids(&self, category: &CategoryKey) -> Vec<String> {
        let inner = self.inner.lock().expect("memory store lock");
        inner
            .docs
            .keys()
            .filter(|(collection, _)| collection == category.as_str())
            .map(|(_, id)| id.clone())
            .collect()
    }

    /// Total number of documents across all categories
    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("memory store lock");
        inner.docs.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sizes of every acknowledged commit, in commit order
    pub fn commit_sizes(&self) -> Vec<usize> {
        let inner = self.inner.lock().expect("memory store lock");
        inner.commit_sizes.clone()
    }
}

impl CatalogStore for MemoryStore {
    type Error = StoreError;
    type Batch = MemoryBatch;

    fn batch(&self) -> MemoryBatch {
        MemoryBatch {
            inner: Arc::clone(&self.inner),
            ops: Vec::new(),
        }
    }
}

/// A pending group of document writes against a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryBatch {
    inner: Arc<Mutex<MemoryInner>>,
    ops: Vec<(String, String, Value)>,
}

impl WriteBatch for MemoryBatch {
    type Error = StoreError;

    fn set(&mut self, category: &CategoryKey, id: &str, document: Value) {
        self.ops
            .push((category.as_str().to_string(), id.to_string(), document));
    }

    fn len(&self) -> usize {
        self.ops.len()
    }

    async fn commit(self) -> Result<usize, StoreError> {
        if self.ops.len() > PROVIDER_BATCH_CAP {
            return Err(StoreError::BatchTooLarge(self.ops.len(), PROVIDER_BATCH_CAP));
        }

        let mut inner = self.inner.lock().map_err(|_| StoreError::LockPoisoned)?;
        if let Some(limit) = inner.fail_after {
            if inner.commit_sizes.len() >= limit {
                return Err(StoreError::Rejected(format!(
                    "store refused commit #{}",
                    inner.commit_sizes.len() + 1
                )));
            }
        }

        let committed = self.ops.len();
        for (collection, id, document) in self.ops {
            inner.docs.insert((collection, id), document);
        }
        inner.commit_sizes.push(committed);
        Ok(committed)
    }
}
