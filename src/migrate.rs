//! Idempotent schema creation for both backends.

use anyhow::Result;
use sqlx::postgres::PgPool;
use sqlx::sqlite::SqlitePool;

use pdf_rag_core::RagError;

use crate::config::{Config, StoreKind};
use crate::db;

pub async fn migrate_sqlite(pool: &SqlitePool) -> pdf_rag_core::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chunk_vectors (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            content TEXT NOT NULL,
            metadata_json TEXT NOT NULL DEFAULT '{}',
            embedding BLOB NOT NULL,
            dims INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            PRIMARY KEY (collection, id)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RagError::external("sqlite", e))?;

    Ok(())
}

pub async fn migrate_postgres(pool: &PgPool) -> pdf_rag_core::Result<()> {
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
        .execute(pool)
        .await
        .map_err(|e| RagError::external("pgvector", e))?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rag_chunks (
            collection TEXT NOT NULL,
            id TEXT NOT NULL,
            content TEXT NOT NULL,
            metadata JSONB NOT NULL DEFAULT '{}'::jsonb,
            embedding vector NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            PRIMARY KEY (collection, id)
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| RagError::external("pgvector", e))?;

    Ok(())
}

/// Create the schema for the configured store. Returns the backend used.
pub async fn run_migrations(config: &Config) -> Result<StoreKind> {
    let kind = config.require_store()?;
    let timeout = config.store.connect_timeout_secs;

    match &kind {
        StoreKind::Sqlite(url) => {
            let pool = db::connect_sqlite(url, timeout).await?;
            migrate_sqlite(&pool).await?;
            pool.close().await;
        }
        StoreKind::Postgres(url) => {
            let pool = db::connect_postgres(url, timeout).await?;
            migrate_postgres(&pool).await?;
            pool.close().await;
        }
    }

    Ok(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sqlite_migration_is_idempotent() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.store.url = Some(format!("sqlite:{}", tmp.path().join("rag.sqlite").display()));

        assert_eq!(run_migrations(&config).await.unwrap().name(), "sqlite");
        assert_eq!(run_migrations(&config).await.unwrap().name(), "sqlite");
    }

    #[tokio::test]
    async fn missing_store_url_is_a_configuration_error() {
        let err = run_migrations(&Config::default()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RagError>(),
            Some(RagError::Configuration(_))
        ));
    }
}
