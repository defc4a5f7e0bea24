//! OpenAI chat-completions client implementing [`ChatModel`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pdf_rag_core::llm::ChatModel;
use pdf_rag_core::{RagError, Result};

use crate::config::{Config, LlmConfig};
use crate::openai::OpenAIClient;

const SERVICE: &str = "openai-chat";

pub struct OpenAIChatModel {
    client: OpenAIClient,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [Message<'a>; 1],
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAIChatModel {
    pub fn new(config: &LlmConfig, api_key: &str) -> Result<Self> {
        let client = OpenAIClient::new(
            api_key,
            config.api_base.clone(),
            config.timeout_secs,
            config.max_retries,
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let key = config.require_api_key()?;
        Ok(Self::new(&config.llm, key)?)
    }
}

#[async_trait]
impl ChatModel for OpenAIChatModel {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, temperature: f32) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
            temperature,
        };
        let response: ChatResponse = self
            .client
            .post_json(SERVICE, "chat/completions", &request)
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RagError::external(SERVICE, "response contained no message content"))
    }
}
