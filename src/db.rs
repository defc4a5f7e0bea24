//! Connection pools and store selection.
//!
//! `store.url` picks the backend: `sqlite:` URLs open a local SQLite file in
//! WAL mode, `postgres(ql)://` URLs open a pgvector database. Opening a store
//! always runs the idempotent schema migration first.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::debug;

use pdf_rag_core::store::VectorStore;
use pdf_rag_core::Metadata;

use crate::config::{redact_url, Config, StoreKind};
use crate::migrate;
use crate::pgvector_store::PgVectorStore;
use crate::sqlite_store::SqliteVectorStore;

/// File behind a `sqlite:` URL, or `None` for in-memory databases.
pub fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split_once('?').map_or(rest, |(p, _)| p);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

pub async fn connect_sqlite(url: &str, timeout_secs: u64) -> Result<SqlitePool> {
    let file = sqlite_file_path(url);

    // Ensure parent directory exists
    if let Some(parent) = file.as_ref().and_then(|p| p.parent()) {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
    }

    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("Invalid SQLite URL: {}", url))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    // Each in-memory connection is its own database.
    let max_connections = if file.is_some() { 5 } else { 1 };

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(timeout_secs))
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open SQLite database: {}", url))?;

    Ok(pool)
}

pub async fn connect_postgres(url: &str, timeout_secs: u64) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(timeout_secs))
        .connect(url)
        .await
        .with_context(|| format!("Failed to connect to Postgres: {}", redact_url(url)))?;

    Ok(pool)
}

/// Connect, migrate, and wrap the configured backend for the configured
/// collection.
pub async fn open_store(config: &Config) -> Result<Arc<dyn VectorStore>> {
    let kind = config.require_store()?;
    let timeout = config.store.connect_timeout_secs;
    let collection = config.store.collection.clone();
    debug!(backend = kind.name(), collection = %collection, "opening vector store");

    let store: Arc<dyn VectorStore> = match kind {
        StoreKind::Sqlite(url) => {
            let pool = connect_sqlite(&url, timeout).await?;
            migrate::migrate_sqlite(&pool).await?;
            Arc::new(SqliteVectorStore::new(pool, collection))
        }
        StoreKind::Postgres(url) => {
            let pool = connect_postgres(&url, timeout).await?;
            migrate::migrate_postgres(&pool).await?;
            Arc::new(PgVectorStore::new(pool, collection))
        }
    };
    Ok(store)
}

pub(crate) fn encode_metadata(metadata: &Metadata) -> String {
    serde_json::to_string(metadata).unwrap_or_else(|_| "{}".to_string())
}

/// Malformed stored metadata decodes as empty rather than failing a query.
pub(crate) fn decode_metadata(json: &str) -> Metadata {
    serde_json::from_str(json).unwrap_or_default()
}
