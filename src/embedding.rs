//! OpenAI embedding provider.
//!
//! Calls `POST {api_base}/embeddings` with the configured model. Inputs are
//! sent in slices of `embedding.batch_size`; each reply is re-ordered by its
//! `index` field so vectors always line up with the inputs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pdf_rag_core::embedding::EmbeddingProvider;
use pdf_rag_core::{RagError, Result};

use crate::config::{Config, EmbeddingConfig};
use crate::openai::OpenAIClient;

const SERVICE: &str = "openai-embeddings";

pub struct OpenAIProvider {
    client: OpenAIClient,
    model: String,
    dims: Option<usize>,
    batch_size: usize,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAIProvider {
    pub fn new(config: &EmbeddingConfig, api_key: &str) -> Result<Self> {
        let client = OpenAIClient::new(
            api_key,
            config.api_base.clone(),
            config.timeout_secs,
            config.max_retries,
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
            dims: config.dims,
            batch_size: config.batch_size.max(1),
        })
    }

    /// Build from the full config, failing if `OPENAI_API_KEY` is unset.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let key = config.require_api_key()?;
        Ok(Self::new(&config.embedding, key)?)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
            dimensions: self.dims,
        };
        let response: EmbeddingResponse =
            self.client.post_json(SERVICE, "embeddings", &request).await?;
        order_by_index(response.data, texts.len())
    }
}

/// Place each vector at its `index`; every slot must be filled exactly once.
fn order_by_index(data: Vec<EmbeddingData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(RagError::external(
            SERVICE,
            format!("expected {} embeddings, got {}", expected, data.len()),
        ));
    }

    let mut slots: Vec<Option<Vec<f32>>> = vec![None; expected];
    for item in data {
        match slots.get_mut(item.index) {
            Some(slot) if slot.is_none() => *slot = Some(item.embedding),
            _ => {
                return Err(RagError::external(
                    SERVICE,
                    format!("unexpected embedding index {}", item.index),
                ))
            }
        }
    }
    Ok(slots.into_iter().flatten().collect())
}

#[async_trait]
impl EmbeddingProvider for OpenAIProvider {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            debug!(model = %self.model, batch = batch.len(), "embedding batch");
            vectors.extend(self.embed_batch(batch).await?);
        }
        Ok(vectors)
    }
}
