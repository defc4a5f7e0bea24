//! `pdf-rag ask`: answer one question from the indexed document.

use std::sync::Arc;

use anyhow::Result;

use pdf_rag_core::embedding::EmbeddingProvider;
use pdf_rag_core::llm::ChatModel;
use pdf_rag_core::store::VectorStore;
use pdf_rag_core::{Answerer, QaPipeline, Retriever};

use crate::config::Config;
use crate::db;
use crate::embedding::OpenAIProvider;
use crate::llm::OpenAIChatModel;

/// Compose a [`QaPipeline`] with the retrieval and generation settings
/// from `config`.
pub fn build_pipeline(
    config: &Config,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    model: Arc<dyn ChatModel>,
) -> QaPipeline {
    let retriever = Retriever::new(embedder, store).with_k(config.retrieval.top_k);
    let answerer = Answerer::new(model).with_temperature(config.llm.temperature);
    QaPipeline::new(retriever, answerer)
}

/// Build the pipeline against the configured OpenAI endpoints and store.
pub async fn open_pipeline(config: &Config) -> Result<QaPipeline> {
    let embedder = Arc::new(OpenAIProvider::from_config(config)?);
    let model = Arc::new(OpenAIChatModel::from_config(config)?);
    let store = db::open_store(config).await?;
    Ok(build_pipeline(config, embedder, store, model))
}

pub async fn run_ask(config: &Config, question: &str, k: Option<usize>) -> Result<()> {
    let pipeline = open_pipeline(config).await?;
    let k = k.unwrap_or(config.retrieval.top_k);
    let answer = pipeline.ask_k(question, k).await?;
    println!("{}", answer);
    Ok(())
}
