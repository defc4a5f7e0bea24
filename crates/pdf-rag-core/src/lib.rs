//! # pdf-rag Core
//!
//! The retrieval-and-grounding core of pdf-rag: data model, recursive
//! splitter, collaborator traits, and the three pipeline components.
//!
//! This crate contains no tokio, sqlx, HTTP, or filesystem I/O. Every
//! external system (PDF parser, embedding API, vector database, chat model)
//! is reached through a trait that the application crate implements.
//!
//! ## Pipeline
//!
//! ```text
//!  offline                         online (per question)
//! ┌──────────┐                ┌───────────┐    ┌──────────┐
//! │ Ingestor │──▶ VectorStore ◀──│ Retriever │──▶│ Answerer │──▶ Answer
//! └──────────┘                └───────────┘    └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `Page`, `Chunk`, `ScoredResult`, metadata cleaning |
//! | [`splitter`] | Recursive character splitter with overlap |
//! | [`loader`] | `DocumentLoader` trait |
//! | [`embedding`] | `EmbeddingProvider` trait and vector utilities |
//! | [`store`] | `VectorStore` trait and in-memory implementation |
//! | [`llm`] | `ChatModel` trait |
//! | [`prompt`] | Grounding template, context assembly, refusal sentence |
//! | [`ingest`] | Ingestor: load → split → embed → upsert |
//! | [`retrieve`] | Retriever: embed question → top-K search |
//! | [`answer`] | Answerer: refuse or generate |
//! | [`pipeline`] | `QaPipeline` composing Retriever and Answerer |

pub mod answer;
pub mod embedding;
pub mod error;
pub mod ingest;
pub mod llm;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod retrieve;
pub mod splitter;
pub mod store;

pub use answer::{Answer, Answerer};
pub use error::{RagError, Result};
pub use ingest::{IngestReport, Ingestor};
pub use models::{Chunk, Metadata, Page, ScoredResult};
pub use pipeline::QaPipeline;
pub use retrieve::Retriever;
