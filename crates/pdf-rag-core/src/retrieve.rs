//! Retriever: embeds a question and fetches the top-K nearest chunks.

use std::sync::Arc;

use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::models::ScoredResult;
use crate::store::VectorStore;

/// Default number of chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 10;

/// Holds the embedding client and the store handle shared by every query.
pub struct Retriever {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedder,
            store,
            k: DEFAULT_TOP_K,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Retrieve with the configured `k`.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredResult>> {
        self.retrieve_k(question, self.k).await
    }

    /// Retrieve at most `k` results, best first.
    ///
    /// An empty result is a normal outcome meaning nothing relevant is
    /// indexed. `k == 0` returns immediately without any external call.
    pub async fn retrieve_k(&self, question: &str, k: usize) -> Result<Vec<ScoredResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vec = self.embedder.embed_query(question).await?;
        let mut results = self.store.similarity_search(&query_vec, k).await?;
        results.truncate(k);

        debug!(
            collection = self.store.collection(),
            k,
            hits = results.len(),
            "retrieved"
        );
        Ok(results)
    }
}
