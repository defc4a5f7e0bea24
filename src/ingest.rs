//! `pdf-rag ingest`: load the configured PDF into the vector store.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use pdf_rag_core::embedding::EmbeddingProvider;
use pdf_rag_core::splitter::RecursiveSplitter;
use pdf_rag_core::store::VectorStore;
use pdf_rag_core::{IngestReport, Ingestor};

use crate::config::Config;
use crate::db;
use crate::embedding::OpenAIProvider;
use crate::loader::PdfLoader;

/// Build an [`Ingestor`] over the given collaborators using the chunking
/// and reconciliation settings from `config`. The flags only ever enable
/// what the config leaves off.
pub fn build_ingestor(
    config: &Config,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    prune_stale: bool,
    clear_first: bool,
) -> Result<Ingestor> {
    let splitter =
        RecursiveSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap)?;
    Ok(Ingestor::new(Arc::new(PdfLoader), splitter, embedder, store)
        .with_prune_stale(prune_stale || config.ingest.prune_stale)
        .with_clear_first(clear_first || config.ingest.clear_first))
}

/// Run the ingest command and print a summary.
///
/// The document path is checked before anything else so a missing
/// `PDF_PATH` fails without touching the network or the database.
pub async fn run_ingest(
    config: &Config,
    pdf: Option<&Path>,
    prune_stale: bool,
    clear_first: bool,
) -> Result<()> {
    let path = config.require_document_path(pdf)?;
    let embedder = Arc::new(OpenAIProvider::from_config(config)?);
    let store = db::open_store(config).await?;

    let ingestor = build_ingestor(config, embedder, store, prune_stale, clear_first)?;
    let report = ingestor
        .ingest(&path)
        .await
        .with_context(|| format!("Failed to ingest {}", path.display()))?;

    println!("ingest {}", path.display());
    print_report(&config.store.collection, &report);
    Ok(())
}

fn print_report(collection: &str, report: &IngestReport) {
    println!("  collection: {}", collection);
    if report.cleared {
        println!("  cleared: yes");
    }
    println!("  pages: {}", report.pages);
    println!("  chunks written: {}", report.chunks);
    println!("  ids: {}", id_range(&report.ids));
    if !report.stale_ids.is_empty() {
        if report.pruned {
            println!("  stale ids deleted: {}", report.stale_ids.len());
        } else {
            println!(
                "  stale ids remaining: {} ({}); rerun with --prune-stale to delete them",
                report.stale_ids.len(),
                id_range(&report.stale_ids)
            );
        }
    }
    println!("ok");
}

/// `doc-0 .. doc-4` for a run of ids, the single id for one, `-` for none.
fn id_range(ids: &[String]) -> String {
    match ids {
        [] => "-".to_string(),
        [only] => only.clone(),
        [first, .., last] => format!("{} .. {}", first, last),
    }
}
