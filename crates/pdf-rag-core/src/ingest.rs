//! Ingestor: load → split → clean metadata → assign ids → embed → upsert.
//!
//! Chunk ids are `doc-0 .. doc-(n-1)` in split order. Re-ingesting with the
//! same splitter settings overwrites every record in place. A later run that
//! produces fewer chunks leaves the trailing ids of the earlier run behind;
//! those are reported as `stale_ids` and, when pruning is enabled, deleted
//! after the upsert succeeds. Alternatively the collection can be cleared
//! before the new records are written; the clear happens only once embedding
//! has succeeded, so a failed run never leaves the collection empty.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader::DocumentLoader;
use crate::models::{chunk_id, clean_metadata, parse_chunk_index, Chunk, Page, VectorRecord};
use crate::splitter::RecursiveSplitter;
use crate::store::VectorStore;

/// Summary of one ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Pages produced by the loader.
    pub pages: usize,
    /// Chunks written.
    pub chunks: usize,
    /// Ids written, in split order.
    pub ids: Vec<String>,
    /// `doc-N` ids with `N >= chunks` found in the collection after the upsert.
    pub stale_ids: Vec<String>,
    /// Whether `stale_ids` were deleted.
    pub pruned: bool,
    /// Whether the collection was emptied before the upsert.
    pub cleared: bool,
}

pub struct Ingestor {
    loader: Arc<dyn DocumentLoader>,
    splitter: RecursiveSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    prune_stale: bool,
    clear_first: bool,
}

impl Ingestor {
    pub fn new(
        loader: Arc<dyn DocumentLoader>,
        splitter: RecursiveSplitter,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
    ) -> Self {
        Self {
            loader,
            splitter,
            embedder,
            store,
            prune_stale: false,
            clear_first: false,
        }
    }

    /// Delete trailing ids left by a previous, larger ingestion.
    pub fn with_prune_stale(mut self, prune: bool) -> Self {
        self.prune_stale = prune;
        self
    }

    /// Empty the collection before writing this ingestion's records.
    pub fn with_clear_first(mut self, clear: bool) -> Self {
        self.clear_first = clear;
        self
    }

    /// Load the document at `path` and ingest every page.
    ///
    /// # Errors
    ///
    /// - [`RagError::DocumentLoad`] if the loader cannot read the file.
    /// - [`RagError::EmptyDocument`] if splitting yields zero chunks.
    /// - [`RagError::ExternalService`] if embedding or the store fails.
    pub async fn ingest(&self, path: &Path) -> Result<IngestReport> {
        let pages = self.loader.load(path)?;
        debug!(path = %path.display(), pages = pages.len(), "document loaded");
        self.ingest_pages(&path.display().to_string(), &pages).await
    }

    /// Ingest already-loaded pages. `source` only labels errors and logs.
    pub async fn ingest_pages(&self, source: &str, pages: &[Page]) -> Result<IngestReport> {
        let chunks = self.prepare_chunks(pages);
        if chunks.is_empty() {
            return Err(RagError::EmptyDocument {
                source_name: source.to_string(),
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;
        if vectors.len() != chunks.len() {
            return Err(RagError::external(
                self.embedder.model_name(),
                format!(
                    "expected {} embeddings, got {}",
                    chunks.len(),
                    vectors.len()
                ),
            ));
        }

        let records: Vec<VectorRecord> = chunks
            .into_iter()
            .zip(vectors)
            .map(|(chunk, embedding)| VectorRecord { chunk, embedding })
            .collect();
        let ids: Vec<String> = records.iter().map(|r| r.chunk.id.clone()).collect();
        if self.clear_first {
            self.store.clear().await?;
            info!(collection = self.store.collection(), "collection cleared");
        }
        self.store.upsert(&records).await?;

        let stale_ids = self.stale_ids(ids.len()).await?;
        let mut pruned = false;
        if !stale_ids.is_empty() {
            warn!(
                collection = self.store.collection(),
                stale = stale_ids.len(),
                first = %stale_ids[0],
                "collection holds ids beyond this ingestion's chunk range"
            );
            if self.prune_stale {
                self.store.delete(&stale_ids).await?;
                pruned = true;
                info!(deleted = stale_ids.len(), "pruned stale ids");
            }
        }

        info!(
            source,
            collection = self.store.collection(),
            pages = pages.len(),
            chunks = ids.len(),
            "ingestion complete"
        );

        Ok(IngestReport {
            pages: pages.len(),
            chunks: ids.len(),
            ids,
            stale_ids,
            pruned,
            cleared: self.clear_first,
        })
    }

    /// Split pages into chunks with cleaned metadata and sequential ids.
    pub fn prepare_chunks(&self, pages: &[Page]) -> Vec<Chunk> {
        self.splitter
            .split_pages(pages)
            .into_iter()
            .enumerate()
            .map(|(i, (content, metadata))| Chunk {
                id: chunk_id(i),
                content,
                metadata: clean_metadata(metadata),
            })
            .collect()
    }

    /// Ids in the collection shaped `doc-N` with `N >= written`, by index.
    async fn stale_ids(&self, written: usize) -> Result<Vec<String>> {
        let mut stale: Vec<(usize, String)> = self
            .store
            .ids()
            .await?
            .into_iter()
            .filter_map(|id| match parse_chunk_index(&id) {
                Some(n) if n >= written => Some((n, id)),
                _ => None,
            })
            .collect();
        stale.sort();
        Ok(stale.into_iter().map(|(_, id)| id).collect())
    }
}
