//! Question answering: `answer = Answerer(question, Retriever(question))`.

use tracing::info;

use crate::answer::{Answer, Answerer};
use crate::error::Result;
use crate::retrieve::Retriever;

/// Composes a [`Retriever`] and an [`Answerer`].
///
/// Holds no per-question state, so one instance can serve any number of
/// sequential `ask` calls. Retries belong in a wrapper around `ask`.
pub struct QaPipeline {
    retriever: Retriever,
    answerer: Answerer,
}

impl QaPipeline {
    pub fn new(retriever: Retriever, answerer: Answerer) -> Self {
        Self {
            retriever,
            answerer,
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer with the retriever's configured `k`.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        self.ask_k(question, self.retriever.k()).await
    }

    /// Answer using at most `k` retrieved chunks.
    pub async fn ask_k(&self, question: &str, k: usize) -> Result<Answer> {
        let results = self.retriever.retrieve_k(question, k).await?;
        let answer = self.answerer.answer(question, &results).await?;
        info!(
            hits = results.len(),
            refused = answer.is_refusal(),
            "question answered"
        );
        Ok(answer)
    }
}
