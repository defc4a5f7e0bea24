//! Recursive character text splitter.
//!
//! Splits page text into overlapping chunks of at most `chunk_size`
//! characters. Splitting tries progressively finer separators
//! (`"\n\n"`, `"\n"`, `" "`, then individual characters) so that chunks
//! break on paragraph boundaries whenever possible.
//!
//! # Algorithm
//!
//! 1. Pick the first separator that occurs in the text.
//! 2. Split on it, keeping the separator at the start of the following piece.
//! 3. Pieces shorter than `chunk_size` are merged greedily into chunks.
//!    When a chunk is emitted, pieces are dropped from the front of the
//!    window until at most `chunk_overlap` characters remain; those carry
//!    over into the next chunk.
//! 4. Pieces that are too long are split recursively with the remaining
//!    separators.
//! 5. Every chunk is whitespace-trimmed; empty chunks are dropped.
//!
//! Lengths are measured in `char`s, never bytes, so multi-byte text is
//! never cut inside a code point.
//!
//! # Example
//!
//! ```rust
//! use pdf_rag_core::splitter::RecursiveSplitter;
//!
//! let splitter = RecursiveSplitter::new(1000, 150).unwrap();
//! let chunks = splitter.split_text("Paris is the capital of France.");
//! assert_eq!(chunks, vec!["Paris is the capital of France.".to_string()]);
//! ```

use std::collections::VecDeque;

use crate::error::{RagError, Result};
use crate::models::{Metadata, Page};

/// Target chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Characters shared between consecutive chunks of the same page.
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Greedy recursive splitter with a sliding overlap window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl RecursiveSplitter {
    /// # Errors
    ///
    /// [`RagError::Configuration`] if `chunk_size` is zero or the overlap is
    /// not smaller than the chunk size.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::config("chunk_size must be > 0"));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::config(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split one block of text. Deterministic for fixed parameters.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    /// Split every page independently, in page order.
    ///
    /// Each piece carries a copy of its page's metadata. Overlap never
    /// crosses a page boundary and no offset keys are added.
    pub fn split_pages(&self, pages: &[Page]) -> Vec<(String, Metadata)> {
        pages
            .iter()
            .flat_map(|page| {
                self.split_text(&page.text)
                    .into_iter()
                    .map(move |text| (text, page.metadata.clone()))
            })
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let mut separator = "";
        let mut finer: &[&str] = &[];
        for (i, sep) in separators.iter().enumerate() {
            if sep.is_empty() || text.contains(sep) {
                separator = sep;
                finer = &separators[i + 1..];
                break;
            }
        }

        let mut chunks = Vec::new();
        let mut fitting: Vec<&str> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                fitting.push(piece);
                continue;
            }
            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }
            if finer.is_empty() {
                push_trimmed(&mut chunks, piece);
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }

        chunks
    }

    /// Merge small pieces into chunks, carrying an overlap window forward.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                push_trimmed(&mut chunks, &window.iter().copied().collect::<String>());
                while total > self.chunk_overlap || (total > 0 && total + len > self.chunk_size) {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }
            window.push_back(piece);
            total += len;
        }

        if !window.is_empty() {
            push_trimmed(&mut chunks, &window.iter().copied().collect::<String>());
        }

        chunks
    }
}

/// Split `text` on `separator`, attaching each separator to the start of
/// the piece that follows it. An empty separator splits into characters.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (pos, _) in text.match_indices(separator) {
        if pos > start {
            pieces.push(&text[start..pos]);
        }
        start = pos;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

fn push_trimmed(chunks: &mut Vec<String>, text: &str) {
    let trimmed = text.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
