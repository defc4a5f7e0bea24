//! SQLite-backed [`VectorStore`].
//!
//! One row per chunk in `chunk_vectors`, keyed by `(collection, id)`, with
//! the embedding stored as a little-endian f32 BLOB. Similarity search is a
//! brute-force cosine-distance scan over the collection, which is plenty for
//! a single document.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use pdf_rag_core::embedding::{blob_to_vec, cosine_distance, vec_to_blob};
use pdf_rag_core::models::VectorRecord;
use pdf_rag_core::store::{rank_by_distance, VectorStore};
use pdf_rag_core::{Chunk, RagError, Result, ScoredResult};

use crate::db::{decode_metadata, encode_metadata};

const SERVICE: &str = "sqlite";

pub struct SqliteVectorStore {
    pool: SqlitePool,
    collection: String,
}

impl SqliteVectorStore {
    /// Wrap a pool whose schema is already migrated.
    pub fn new(pool: SqlitePool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
        }
    }
}

fn db_err(e: sqlx::Error) -> RagError {
    RagError::external(SERVICE, e)
}

#[async_trait]
impl VectorStore for SqliteVectorStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let now = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO chunk_vectors (collection, id, content, metadata_json, embedding, dims, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(collection, id) DO UPDATE SET
                    content = excluded.content,
                    metadata_json = excluded.metadata_json,
                    embedding = excluded.embedding,
                    dims = excluded.dims,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&self.collection)
            .bind(&record.chunk.id)
            .bind(&record.chunk.content)
            .bind(encode_metadata(&record.chunk.metadata))
            .bind(vec_to_blob(&record.embedding))
            .bind(record.embedding.len() as i64)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        debug!(collection = %self.collection, records = records.len(), "sqlite upsert");
        Ok(())
    }

    async fn similarity_search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT id, content, metadata_json, embedding FROM chunk_vectors WHERE collection = ?",
        )
        .bind(&self.collection)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        let results = rows
            .iter()
            .map(|row| {
                let blob: Vec<u8> = row.get("embedding");
                let metadata_json: String = row.get("metadata_json");
                ScoredResult {
                    chunk: Chunk {
                        id: row.get("id"),
                        content: row.get("content"),
                        metadata: decode_metadata(&metadata_json),
                    },
                    score: cosine_distance(query_vec, &blob_to_vec(&blob)),
                }
            })
            .collect();

        Ok(rank_by_distance(results, k))
    }

    async fn count(&self) -> Result<usize> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunk_vectors WHERE collection = ?")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(n as usize)
    }

    async fn get(&self, id: &str) -> Result<Option<Chunk>> {
        let row = sqlx::query(
            "SELECT id, content, metadata_json FROM chunk_vectors WHERE collection = ? AND id = ?",
        )
        .bind(&self.collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|row| {
            let metadata_json: String = row.get("metadata_json");
            Chunk {
                id: row.get("id"),
                content: row.get("content"),
                metadata: decode_metadata(&metadata_json),
            }
        }))
    }

    async fn ids(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT id FROM chunk_vectors WHERE collection = ? ORDER BY id")
            .bind(&self.collection)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;
        for id in ids {
            sqlx::query("DELETE FROM chunk_vectors WHERE collection = ? AND id = ?")
                .bind(&self.collection)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_err)?;
        }
        tx.commit().await.map_err(db_err)
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM chunk_vectors WHERE collection = ?")
            .bind(&self.collection)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_sqlite;
    use crate::migrate::migrate_sqlite;
    use pdf_rag_core::Metadata;
    use serde_json::json;
    use tempfile::TempDir;

    async fn store(tmp: &TempDir, collection: &str) -> SqliteVectorStore {
        let url = format!("sqlite:{}", tmp.path().join("rag.sqlite").display());
        let pool = connect_sqlite(&url, 5).await.unwrap();
        migrate_sqlite(&pool).await.unwrap();
        SqliteVectorStore::new(pool, collection)
    }

    fn record(id: &str, content: &str, embedding: Vec<f32>) -> VectorRecord {
        let mut metadata = Metadata::new();
        metadata.insert("source".into(), json!("doc.pdf"));
        metadata.insert("page".into(), json!(0));
        VectorRecord {
            chunk: Chunk {
                id: id.into(),
                content: content.into(),
                metadata,
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn upsert_then_search_ranks_by_distance() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp, "c").await;
        store
            .upsert(&[
                record("doc-0", "east", vec![1.0, 0.0]),
                record("doc-1", "north", vec![0.0, 1.0]),
                record("doc-2", "north-east", vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.similarity_search(&[0.0, 1.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "doc-1");
        assert_eq!(results[1].chunk.id, "doc-2");
        assert!(results[0].score.abs() < 1e-6);
        assert_eq!(results[0].chunk.metadata["source"], json!("doc.pdf"));
    }

    #[tokio::test]
    async fn reupsert_overwrites_rather_than_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = store(&tmp, "c").await;
        store.upsert(&[record("doc-0", "old", vec![1.0])]).await.unwrap();
        store.upsert(&[record("doc-0", "new", vec![1.0])]).await.unwrap();

        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get("doc-0").await.unwrap().unwrap().content, "new");
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let tmp = TempDir::new().unwrap();
        let a = store(&tmp, "a").await;
        let b = store(&tmp, "b").await;
        a.upsert(&[record("doc-0", "in a", vec![1.0])]).await.unwrap();

        assert_eq!(a.count().await.unwrap(), 1);
        assert_eq!(b.count().await.unwrap(), 0);
        assert!(b.similarity_search(&[1.0], 10).await.unwrap().is_empty());
        assert!(b.get("doc-0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_and_clear_only_touch_own_collection() {
        let tmp = TempDir::new().unwrap();
        let a = store(&tmp, "a").await;
        let b = store(&tmp, "b").await;
        a.upsert(&[record("doc-0", "x", vec![1.0]), record("doc-1", "y", vec![1.0])])
            .await
            .unwrap();
        b.upsert(&[record("doc-0", "z", vec![1.0])]).await.unwrap();

        a.delete(&["doc-1".to_string()]).await.unwrap();
        assert_eq!(a.ids().await.unwrap(), vec!["doc-0"]);

        a.clear().await.unwrap();
        assert_eq!(a.count().await.unwrap(), 0);
        assert_eq!(b.count().await.unwrap(), 1);
    }
}
