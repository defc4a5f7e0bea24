//! In-memory [`VectorStore`] implementation for tests and embedding.
//!
//! Records live in a `BTreeMap` behind `std::sync::RwLock`. Similarity
//! search is brute-force cosine distance over every stored vector.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::embedding::cosine_distance;
use crate::error::{RagError, Result};
use crate::models::{Chunk, ScoredResult, VectorRecord};

use super::{rank_by_distance, VectorStore};

/// In-memory store for one collection.
pub struct InMemoryStore {
    collection: String,
    records: RwLock<BTreeMap<String, VectorRecord>>,
}

impl InMemoryStore {
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            records: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, VectorRecord>>> {
        self.records
            .read()
            .map_err(|_| RagError::external("memory-store", "lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, VectorRecord>>> {
        self.records
            .write()
            .map_err(|_| RagError::external("memory-store", "lock poisoned"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new("default_collection")
    }
}

#[async_trait]
impl VectorStore for InMemoryStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let mut stored = self.write()?;
        for record in records {
            stored.insert(record.chunk.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn similarity_search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredResult>> {
        let stored = self.read()?;
        let results = stored
            .values()
            .map(|record| ScoredResult {
                chunk: record.chunk.clone(),
                score: cosine_distance(query_vec, &record.embedding),
            })
            .collect();
        Ok(rank_by_distance(results, k))
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    async fn get(&self, id: &str) -> Result<Option<Chunk>> {
        Ok(self.read()?.get(id).map(|r| r.chunk.clone()))
    }

    async fn ids(&self) -> Result<Vec<String>> {
        Ok(self.read()?.keys().cloned().collect())
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        let mut stored = self.write()?;
        for id in ids {
            stored.remove(id);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Metadata;

    fn record(id: &str, content: &str, embedding: Vec<f32>) -> VectorRecord {
        VectorRecord {
            chunk: Chunk {
                id: id.to_string(),
                content: content.to_string(),
                metadata: Metadata::new(),
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn search_orders_by_ascending_distance() {
        let store = InMemoryStore::new("test");
        store
            .upsert(&[
                record("doc-0", "east", vec![1.0, 0.0]),
                record("doc-1", "north", vec![0.0, 1.0]),
                record("doc-2", "north-east", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[0.0, 1.0], 2).await.unwrap();
        let ids: Vec<&str> = results.iter().map(|r| r.chunk.id.as_str()).collect();
        assert_eq!(ids, vec!["doc-1", "doc-2"]);
        assert!(results[0].score <= results[1].score);
    }

    #[tokio::test]
    async fn upsert_overwrites_existing_ids() {
        let store = InMemoryStore::new("test");
        store.upsert(&[record("doc-0", "old", vec![1.0])]).await.unwrap();
        store.upsert(&[record("doc-0", "new", vec![1.0])]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get("doc-0").await.unwrap().unwrap().content, "new");
    }

    #[tokio::test]
    async fn empty_store_returns_no_results() {
        let store = InMemoryStore::default();
        assert!(store.similarity_search(&[1.0], 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_and_clear() {
        let store = InMemoryStore::new("test");
        store
            .upsert(&[record("doc-0", "a", vec![1.0]), record("doc-1", "b", vec![1.0])])
            .await
            .unwrap();
        store.delete(&["doc-1".to_string()]).await.unwrap();
        assert_eq!(store.ids().await.unwrap(), vec!["doc-0"]);
        store.clear().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
