//! Error taxonomy shared by the core and the application layer.
//!
//! A question with no grounding context is not an error: it produces
//! [`Answer::Refused`](crate::answer::Answer::Refused).

use std::fmt::Display;

use thiserror::Error;

/// Errors that can occur while ingesting or answering.
#[derive(Debug, Error)]
pub enum RagError {
    /// A required setting is missing or invalid. Fatal, never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The loader and splitter produced zero chunks for a document.
    #[error("document '{source_name}' produced no chunks")]
    EmptyDocument {
        /// Path or label of the document.
        source_name: String,
    },

    /// The document could not be read or parsed.
    #[error("failed to load document '{path}': {message}")]
    DocumentLoad {
        /// Path that was requested.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An embedding, vector-store, or language-model call failed.
    #[error("{service} error: {message}")]
    ExternalService {
        /// The collaborator that failed (e.g. `"openai-embeddings"`, `"sqlite"`).
        service: String,
        /// A description of the failure.
        message: String,
    },
}

impl RagError {
    /// Shorthand for [`RagError::ExternalService`].
    pub fn external(service: impl Into<String>, err: impl Display) -> Self {
        RagError::ExternalService {
            service: service.into(),
            message: err.to_string(),
        }
    }

    /// Shorthand for [`RagError::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        RagError::Configuration(message.into())
    }
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, RagError>;
