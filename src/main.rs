//! # pdf-rag CLI
//!
//! ## Usage
//!
//! ```bash
//! pdf-rag [--config ./config/pdf-rag.toml] [-v] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `pdf-rag init` | Create the vector store schema |
//! | `pdf-rag ingest` | Load, split, embed, and store the configured PDF |
//! | `pdf-rag ask "<question>"` | Answer one question |
//! | `pdf-rag chat` | Interactive question loop |
//! | `pdf-rag stats` | Record count and id health of the collection |
//! | `pdf-rag completions <shell>` | Print shell completions |
//!
//! Settings come from the TOML file and from the environment (a `.env` file
//! in the working directory is loaded first): `PDF_PATH`, `PGVECTOR_URL`,
//! `PG_VECTOR_COLLECTION_NAME`, `OPENAI_MODEL`, `OPENAI_API_KEY`, ...

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use pdf_rag::{ask, chat, config, ingest, logging, migrate, stats};

/// pdf-rag: ask grounded questions about a PDF.
#[derive(Parser)]
#[command(
    name = "pdf-rag",
    about = "pdf-rag — ask grounded questions about a PDF",
    version,
    long_about = "pdf-rag ingests a PDF into a vector store (SQLite or Postgres with pgvector) \
    using OpenAI embeddings, then answers questions with a chat model that may only use the \
    retrieved passages. Questions with no relevant passages get a fixed refusal."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/pdf-rag.toml` when that file exists; otherwise
    /// settings come only from the environment.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the vector store schema.
    ///
    /// Idempotent: running it multiple times is safe.
    Init,

    /// Ingest the configured PDF.
    ///
    /// Chunks get ids `doc-0 .. doc-(n-1)` in split order; re-ingesting
    /// overwrites them in place.
    Ingest {
        /// PDF to ingest (overrides `PDF_PATH` and `[document].path`).
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// Delete `doc-N` records left over from a larger previous ingestion.
        #[arg(long)]
        prune_stale: bool,

        /// Empty the collection before writing the new chunks.
        #[arg(long)]
        clear: bool,
    },

    /// Answer a single question.
    Ask {
        /// The question.
        question: String,

        /// Number of chunks to retrieve (default: `[retrieval].top_k`).
        #[arg(long)]
        k: Option<usize>,
    },

    /// Ask questions interactively. Type `sair` (or `exit`/`quit`) to leave.
    Chat {
        /// Number of chunks to retrieve (default: `[retrieval].top_k`).
        #[arg(long)]
        k: Option<usize>,
    },

    /// Show record count and id health of the collection.
    Stats,

    /// Print a shell completion script to stdout.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    // Commands that don't require config
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "pdf-rag", &mut std::io::stdout());
        return Ok(());
    }

    let cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => {
            let kind = migrate::run_migrations(&cfg).await?;
            println!("Vector store initialized successfully ({}).", kind.name());
        }
        Commands::Ingest {
            pdf,
            prune_stale,
            clear,
        } => {
            ingest::run_ingest(&cfg, pdf.as_deref(), prune_stale, clear).await?;
        }
        Commands::Ask { question, k } => {
            ask::run_ask(&cfg, &question, k).await?;
        }
        Commands::Chat { k } => {
            chat::run_chat(&cfg, k).await?;
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
