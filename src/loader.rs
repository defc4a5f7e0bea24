//! PDF page loader backed by `pdf-extract`.

use std::path::Path;

use pdf_rag_core::loader::DocumentLoader;
use pdf_rag_core::{Page, RagError, Result};

/// Loads a PDF into one [`Page`] per physical page.
///
/// Page metadata: `source` (the path as given), `page` (0-based),
/// `page_label` (1-based, as a string), `total_pages`.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfLoader;

impl PdfLoader {
    /// Split raw PDF bytes into pages. `source` labels metadata and errors.
    pub fn load_bytes(&self, source: &str, bytes: &[u8]) -> Result<Vec<Page>> {
        let texts = pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| {
            RagError::DocumentLoad {
                path: source.to_string(),
                message: format!("PDF extraction failed: {}", e),
            }
        })?;

        let total = texts.len();
        Ok(texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                Page::new(text)
                    .with_metadata("source", source)
                    .with_metadata("page", i as u64)
                    .with_metadata("page_label", (i + 1).to_string())
                    .with_metadata("total_pages", total as u64)
            })
            .collect())
    }
}

impl DocumentLoader for PdfLoader {
    fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let source = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|e| RagError::DocumentLoad {
            path: source.clone(),
            message: e.to_string(),
        })?;
        self.load_bytes(&source, &bytes)
    }
}
