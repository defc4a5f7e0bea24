//! Vector storage abstraction.
//!
//! The [`VectorStore`] trait defines every storage operation the Ingestor
//! and Retriever need, enabling pluggable backends (SQLite, pgvector,
//! in-memory). A store instance is bound to one named collection.
//!
//! Implementations must be `Send + Sync` and safe to reuse across
//! sequential calls. Connection pooling, if any, is theirs to manage.

pub mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Chunk, ScoredResult, VectorRecord};

pub use memory::InMemoryStore;

/// Abstract vector index scoped to a single collection.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert`](VectorStore::upsert) | Insert or overwrite records by id |
/// | [`similarity_search`](VectorStore::similarity_search) | Top-K by cosine distance |
/// | [`count`](VectorStore::count) | Records in the collection |
/// | [`get`](VectorStore::get) | Fetch one chunk by id |
/// | [`ids`](VectorStore::ids) | All ids in the collection |
/// | [`delete`](VectorStore::delete) | Remove records by id |
/// | [`clear`](VectorStore::clear) | Remove every record in the collection |
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Name of the collection this store reads and writes.
    fn collection(&self) -> &str;

    /// Write all records in one batch. Existing ids are overwritten, never
    /// duplicated.
    async fn upsert(&self, records: &[VectorRecord]) -> Result<()>;

    /// Return at most `k` chunks ordered by ascending cosine distance
    /// (best first). An empty collection yields an empty vector.
    async fn similarity_search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredResult>>;

    async fn count(&self) -> Result<usize>;

    async fn get(&self, id: &str) -> Result<Option<Chunk>>;

    /// All ids in the collection, sorted.
    async fn ids(&self) -> Result<Vec<String>>;

    async fn delete(&self, ids: &[String]) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}

/// Sort scored results best-first and keep the top `k`.
pub fn rank_by_distance(mut results: Vec<ScoredResult>, k: usize) -> Vec<ScoredResult> {
    results.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.chunk.id.cmp(&b.chunk.id))
    });
    results.truncate(k);
    results
}
