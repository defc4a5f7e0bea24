//! Answerer: turns retrieved results into a grounded answer or a refusal.
//!
//! # State machine
//!
//! ```text
//! START ──(no results / all chunks blank)────▶ REFUSE
//!   │
//!   └─ build context ──(blank after trim)─────▶ REFUSE
//!            │
//!            └─ render prompt ─▶ GENERATE ─▶ DONE (trimmed model output)
//! ```
//!
//! REFUSE never calls the language model, so the common "nothing indexed"
//! case does not depend on the model obeying the prompt.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::llm::ChatModel;
use crate::models::ScoredResult;
use crate::prompt::{build_context, render_prompt, REFUSAL};

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The model's reply, trimmed.
    Generated(String),
    /// No grounding context was found; the model was not called.
    Refused,
}

impl Answer {
    /// The text shown to the user: the reply, or the fixed [`REFUSAL`].
    pub fn text(&self) -> &str {
        match self {
            Answer::Generated(text) => text,
            Answer::Refused => REFUSAL,
        }
    }

    pub fn is_refusal(&self) -> bool {
        matches!(self, Answer::Refused)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Renders the grounding prompt and invokes the language model.
pub struct Answerer {
    model: Arc<dyn ChatModel>,
    temperature: f32,
}

impl Answerer {
    /// Answerer with temperature `0.0`.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            temperature: 0.0,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Answer `question` from ranked retrieval results.
    ///
    /// # Errors
    ///
    /// Propagates the language model's
    /// [`ExternalService`](crate::error::RagError::ExternalService) error.
    pub async fn answer(&self, question: &str, results: &[ScoredResult]) -> Result<Answer> {
        if results.is_empty() {
            debug!("no retrieval results; refusing");
            return Ok(Answer::Refused);
        }
        if results.iter().all(|r| r.chunk.content.trim().is_empty()) {
            debug!(results = results.len(), "retrieved chunks are blank; refusing");
            return Ok(Answer::Refused);
        }
        self.answer_with_context(question, &build_context(results))
            .await
    }

    /// Answer `question` from an already assembled context block.
    ///
    /// A context that is blank after trimming yields [`Answer::Refused`]
    /// without calling the model.
    pub async fn answer_with_context(&self, question: &str, context: &str) -> Result<Answer> {
        if context.trim().is_empty() {
            debug!("context is blank; refusing");
            return Ok(Answer::Refused);
        }

        let prompt = render_prompt(context, question);
        debug!(
            model = self.model.model_name(),
            prompt_chars = prompt.chars().count(),
            "generating answer"
        );
        let reply = self.model.complete(&prompt, self.temperature).await?;
        Ok(Answer::Generated(reply.trim().to_string()))
    }
}
