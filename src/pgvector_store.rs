//! Postgres + pgvector [`VectorStore`].
//!
//! Rows live in `rag_chunks`, keyed by `(collection, id)`, with metadata as
//! `JSONB` and the embedding as an untyped `vector` column. Vectors travel as
//! pgvector text literals (`[0.1,0.2,…]`) cast server-side, and ranking uses
//! the `<=>` cosine-distance operator so scores match the SQLite backend.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::Row;
use tracing::debug;

use pdf_rag_core::embedding::vector_literal;
use pdf_rag_core::models::VectorRecord;
use pdf_rag_core::store::VectorStore;
use pdf_rag_core::{Chunk, RagError, Result, ScoredResult};

use crate::db::{decode_metadata, encode_metadata};

const SERVICE: &str = "pgvector";

pub struct PgVectorStore {
    pool: PgPool,
    collection: String,
}

impl PgVectorStore {
    /// Wrap a pool whose schema is already migrated.
    pub fn new(pool: PgPool, collection: impl Into<String>) -> Self {
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
impl VectorStore for PgVectorStore {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn upsert(&self, records: &[VectorRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        for record in records {
            sqlx::query(
                r#"
                INSERT INTO rag_chunks (collection, id, content, metadata, embedding, updated_at)
                VALUES ($1, $2, $3, $4::jsonb, $5::vector, now())
                ON CONFLICT (collection, id) DO UPDATE SET
                    content = excluded.content,
                    metadata = excluded.metadata,
                    embedding = excluded.embedding,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(&self.collection)
            .bind(&record.chunk.id)
            .bind(&record.chunk.content)
            .bind(encode_metadata(&record.chunk.metadata))
            .bind(vector_literal(&record.embedding))
            .execute(&mut *tx)
            .await
            .map_err(db_err)?;
        }

        tx.commit().await.map_err(db_err)?;
        debug!(collection = %self.collection, records = records.len(), "pgvector upsert");
        Ok(())
    }

    async fn similarity_search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT id, content, metadata::text AS metadata,
                   (embedding <=> $1::vector)::float8 AS distance
            FROM rag_chunks
            WHERE collection = $2
            ORDER BY distance ASC, id ASC
            LIMIT $3
            "#,
        )
        .bind(vector_literal(query_vec))
        .bind(&self.collection)
        .bind(k as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .iter()
            .map(|row| {
                let metadata: String = row.get("metadata");
                let distance: f64 = row.get("distance");
                ScoredResult {
                    chunk: Chunk {
                        id: row.get("id"),
                        content: row.get("content"),
                        metadata: decode_metadata(&metadata),
                    },
                    score: distance as f32,
                }
            })
            .collect())
    }

    async fn count(&self) -> Result<usize> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rag_chunks WHERE collection = $1")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(n as usize)
    }

    async fn get(&self, id: &str) -> Result<Option<Chunk>> {
        let row = sqlx::query(
            "SELECT id, content, metadata::text AS metadata FROM rag_chunks WHERE collection = $1 AND id = $2",
        )
        .bind(&self.collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(row.map(|row| {
            let metadata: String = row.get("metadata");
            Chunk {
                id: row.get("id"),
                content: row.get("content"),
                metadata: decode_metadata(&metadata),
            }
        }))
    }

    async fn ids(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT id FROM rag_chunks WHERE collection = $1 ORDER BY id")
            .bind(&self.collection)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        sqlx::query("DELETE FROM rag_chunks WHERE collection = $1 AND id = ANY($2)")
            .bind(&self.collection)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM rag_chunks WHERE collection = $1")
            .bind(&self.collection)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
