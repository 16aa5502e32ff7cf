//! Integration tests for flexion-store
//!
//! These tests verify document persistence, upsert semantics, and the
//! provider batch cap against a real on-disk database.

use flexion_domain::traits::{CatalogStore, WriteBatch};
use flexion_domain::{CategoryKey, Record};
use flexion_store::SqliteStore;

fn category(name: &str) -> CategoryKey {
    CategoryKey::new(name).unwrap()
}

#[tokio::test]
async fn test_documents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let chest = category("chest");

    {
        let store = SqliteStore::open(&db_path).unwrap();
        let mut batch = store.batch();
        let record = Record::new("bench-press", "Bench Press");
        batch.set(&chest, &record.id, serde_json::to_value(&record).unwrap());
        batch.commit().await.unwrap();
    }

    let reopened = SqliteStore::open(&db_path).unwrap();
    let doc = reopened.get(&chest, "bench-press").unwrap();
    assert!(doc.is_some(), "Document should survive a reopen");
    assert_eq!(doc.unwrap()["name"], "Bench Press");
}

#[tokio::test]
async fn test_batch_is_atomic() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let back = category("back");

    let store = SqliteStore::open(&db_path).unwrap();
    let mut batch = store.batch();
    for i in 0..50 {
        batch.set(&back, &format!("row-{}", i), serde_json::json!({"n": i}));
    }
    batch.commit().await.unwrap();

    assert_eq!(store.count(&back).unwrap(), 50);
    assert_eq!(store.ids(&back).unwrap().len(), 50);
}

#[tokio::test]
async fn test_reingestion_overwrites_instead_of_duplicating() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("catalog.db");
    let legs = category("legs");

    let store = SqliteStore::open(&db_path).unwrap();

    for pass in 0..2 {
        let mut batch = store.batch();
        for id in ["squat", "lunge", "leg-press"] {
            batch.set(&legs, id, serde_json::json!({"pass": pass}));
        }
        batch.commit().await.unwrap();
    }

    assert_eq!(store.count(&legs).unwrap(), 3);
    let doc = store.get(&legs, "squat").unwrap().unwrap();
    assert_eq!(doc["pass"], 1);
}
