//! Vector store statistics and id health.
//!
//! Used by `pdf-rag stats` to show how many records the collection holds and
//! whether the `doc-N` ids form one contiguous run. A gap or a tail longer
//! than the last ingestion usually means stale records from an earlier,
//! larger ingestion.

use anyhow::Result;

use pdf_rag_core::models::{chunk_id, parse_chunk_index};
use pdf_rag_core::store::VectorStore;

use crate::config::{redact_url, Config};
use crate::db;

/// Summary of one collection's ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub records: usize,
    /// Distinct indices of `doc-N` ids, ascending.
    pub chunk_indices: Vec<usize>,
    /// Ids not shaped `doc-N`.
    pub other_ids: usize,
}

impl StoreStats {
    /// Number of `doc-N` ids absent from `0..=max`.
    pub fn missing_count(&self) -> usize {
        match self.chunk_indices.last() {
            Some(&max) => max - (self.chunk_indices.len() - 1),
            None => 0,
        }
    }

    /// Lowest index absent from `0..=max`.
    pub fn first_missing(&self) -> Option<usize> {
        self.chunk_indices
            .iter()
            .enumerate()
            .find(|&(expected, &index)| index != expected)
            .map(|(expected, _)| expected)
    }

    pub fn is_contiguous(&self) -> bool {
        self.missing_count() == 0
    }
}

pub async fn collect_stats(store: &dyn VectorStore) -> pdf_rag_core::Result<StoreStats> {
    let ids = store.ids().await?;
    let mut chunk_indices: Vec<usize> = ids.iter().filter_map(|id| parse_chunk_index(id)).collect();
    let chunk_ids = chunk_indices.len();
    chunk_indices.sort_unstable();
    chunk_indices.dedup();
    Ok(StoreStats {
        records: ids.len(),
        other_ids: ids.len() - chunk_ids,
        chunk_indices,
    })
}

/// Run the stats command: query the store and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let kind = config.require_store()?;
    let store = db::open_store(config).await?;
    let stats = collect_stats(store.as_ref()).await?;

    println!("pdf-rag — Store Stats");
    println!("=====================");
    println!();
    println!("  Backend:     {}", kind.name());
    if let Some(url) = &config.store.url {
        println!("  Store:       {}", redact_url(url));
    }
    if let Some(path) = config.store.url.as_deref().and_then(db::sqlite_file_path) {
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        println!("  Size:        {}", format_bytes(size));
    }
    println!("  Collection:  {}", store.collection());
    println!();
    println!("  Records:     {}", stats.records);

    match (stats.chunk_indices.first(), stats.chunk_indices.last()) {
        (Some(&first), Some(&last)) => {
            println!("  Chunk ids:   {} .. {}", chunk_id(first), chunk_id(last));
            match stats.first_missing() {
                None => println!("  Id health:   contiguous"),
                Some(gap) => println!(
                    "  Id health:   {} missing (first: {}); re-ingest with --clear",
                    stats.missing_count(),
                    chunk_id(gap)
                ),
            }
        }
        _ => println!("  Chunk ids:   none"),
    }
    if stats.other_ids > 0 {
        println!("  Other ids:   {}", stats.other_ids);
    }
    println!();

    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
