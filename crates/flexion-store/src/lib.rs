//! Flexion Storage Layer
//!
//! Implementations of the `CatalogStore` trait from `flexion-domain`.
//!
//! # Architecture
//!
//! - `SqliteStore`: a SQLite-backed document table addressed by
//!   `collection/doc_id`, with whole-document upsert semantics
//! - `MemoryStore`: deterministic in-memory double for tests, recording the
//!   size of every commit it acknowledges
//!
//! Both enforce the provider's hard cap on operations per commit
//! ([`flexion_domain::traits::PROVIDER_BATCH_CAP`]); callers are expected to
//! batch below it with a safety margin.
//!
//! # Examples
//!
//! ```no_run
//! use flexion_store::SqliteStore;
//!
//! let store = SqliteStore::open("flexion.db").unwrap();
//! // Store is now ready for batched document writes
//! ```

#![warn(missing_docs)]

pub mod memory;

use flexion_domain::traits::{CatalogStore, WriteBatch, PROVIDER_BATCH_CAP};
use flexion_domain::CategoryKey;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Commit larger than the provider allows
    #[error("Batch of {0} operations exceeds the provider limit of {1}")]
    BatchTooLarge(usize, usize),

    /// Document body could not be encoded or decoded
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Commit refused by the store
    #[error("Commit rejected: {0}")]
    Rejected(String),

    /// Connection lock poisoned by a panicking writer
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// SQLite-based implementation of `CatalogStore`
///
/// Documents live in a single table keyed by `(collection, doc_id)`; a `set`
/// replaces the whole body. Commits run inside one transaction, so a batch
/// is applied atomically or not at all. Nothing links one batch to the next.
///
/// Cloning yields another handle on the same underlying connection.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory store, useful for testing
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute_batch(schema)?;
        Ok(())
    }

    /// Fetch one document, or `None` if it was never written
    pub fn get(&self, category: &CategoryKey, id: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2",
                params![category.as_str(), id],
                |row| row.get(0),
            )
            .optional()?;
        match body {
            Some(text) => {
                let value = serde_json::from_str(&text)
                    .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Document ids stored under a category, sorted
    pub fn ids(&self, category: &CategoryKey) -> Result<Vec<String>, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let mut stmt = conn.prepare(
            "SELECT doc_id FROM documents WHERE collection = ?1 ORDER BY doc_id",
        )?;
        let rows = stmt.query_map(params![category.as_str()], |row| row.get(0))?;
        let mut ids = Vec::new();
        for row in rows {
            ids.push(row?);
        }
        Ok(ids)
    }

    /// Number of documents stored under a category
    pub fn count(&self, category: &CategoryKey) -> Result<usize, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![category.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl CatalogStore for SqliteStore {
    type Error = StoreError;
    type Batch = SqliteBatch;

    fn batch(&self) -> SqliteBatch {
        SqliteBatch {
            conn: Arc::clone(&self.conn),
            ops: Vec::new(),
        }
    }
}

/// A pending group of document writes against a [`SqliteStore`]
pub struct SqliteBatch {
    conn: Arc<Mutex<Connection>>,
    ops: Vec<(String, String, Value)>,
}

impl WriteBatch for SqliteBatch {
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

        let committed = self.ops.len();
        let mut conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO documents (collection, doc_id, body, updated_at)
                 VALUES (?1, ?2, ?3, strftime('%s', 'now'))
                 ON CONFLICT (collection, doc_id) DO UPDATE SET
                     body = excluded.body,
                     updated_at = excluded.updated_at",
            )?;
            for (collection, doc_id, document) in &self.ops {
                let body = serde_json::to_string(document)
                    .map_err(|e| StoreError::InvalidDocument(e.to_string()))?;
                stmt.execute(params![collection, doc_id, body])?;
            }
        }
        tx.commit()?;
        Ok(committed)
    }
}
