//! Language-model trait.

use async_trait::async_trait;

use crate::error::Result;

/// A chat-completion backend that answers a single user turn.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Returns the model identifier (e.g. `"gpt-5-nano"`).
    fn model_name(&self) -> &str;

    /// Send `prompt` as one user message and return the raw reply text.
    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String>;
}
