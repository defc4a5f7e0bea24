//! # pdf-rag
//!
//! Ask grounded questions about a PDF.
//!
//! `pdf-rag` loads a PDF page by page, splits it into overlapping chunks,
//! stores OpenAI embeddings of those chunks in a vector store (SQLite or
//! Postgres with pgvector), and answers questions with a chat model that is
//! only shown the retrieved chunks. When nothing relevant is indexed it
//! returns a fixed refusal sentence without calling the model.
//!
//! The retrieval-and-grounding logic lives in the `pdf-rag-core` crate; this
//! crate supplies the concrete collaborators and the CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────────┐
//! │ PdfLoader│──▶│   Ingestor   │──▶│ SQLite / pgvector │
//! └──────────┘   │ split+embed  │   └────────┬─────────┘
//!                └──────────────┘            │
//!                                            ▼
//!                 question ──▶ Retriever ──▶ Answerer ──▶ answer
//!                               (OpenAI        (OpenAI chat)
//!                              embeddings)
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=sk-...
//! export PGVECTOR_URL=sqlite:./data/rag.sqlite
//! export PDF_PATH=./document.pdf
//! pdf-rag init
//! pdf-rag ingest
//! pdf-rag ask "Qual é o faturamento da empresa?"
//! pdf-rag chat
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment overrides |
//! | [`logging`] | Tracing subscriber setup |
//! | [`loader`] | PDF page loader |
//! | [`openai`] | Shared OpenAI HTTP transport with retry |
//! | [`embedding`] | OpenAI embedding provider |
//! | [`llm`] | OpenAI chat model |
//! | [`db`] | Connection pools and store selection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite vector store |
//! | [`pgvector_store`] | Postgres + pgvector vector store |
//! | [`ingest`] | `ingest` command |
//! | [`ask`] | `ask` command and pipeline assembly |
//! | [`chat`] | Interactive `chat` loop |
//! | [`stats`] | `stats` command |

pub mod ask;
pub mod chat;
pub mod config;
pub mod db;
pub mod embedding;
pub mod ingest;
pub mod llm;
pub mod loader;
pub mod logging;
pub mod migrate;
pub mod openai;
pub mod pgvector_store;
pub mod sqlite_store;
pub mod stats;
