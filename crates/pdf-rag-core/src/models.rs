//! Core data models that flow through the ingestion and retrieval pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scalar metadata attached to pages and chunks.
///
/// Values are expected to be scalars (strings, numbers, booleans). Ordered
/// so that serialized metadata is deterministic.
pub type Metadata = BTreeMap<String, serde_json::Value>;

/// Prefix of every chunk identifier.
pub const CHUNK_ID_PREFIX: &str = "doc-";

/// One physical page of extracted document text.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub text: String,
    pub metadata: Metadata,
}

impl Page {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Metadata::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A contiguous span of document text stored as one retrievable unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// `doc-{n}`, assigned in split order.
    pub id: String,
    /// Raw split text.
    pub content: String,
    /// Page metadata with empty values removed.
    pub metadata: Metadata,
}

/// A chunk together with the embedding written alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRecord {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// A chunk returned by similarity search.
///
/// `score` is the cosine distance between the query and the chunk:
/// `0.0` means identical direction, lower is better. Results are ranked
/// ascending by score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// Drop metadata entries whose value is `null` or an empty string.
pub fn clean_metadata(metadata: Metadata) -> Metadata {
    metadata
        .into_iter()
        .filter(|(_, v)| match v {
            serde_json::Value::Null => false,
            serde_json::Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .collect()
}

/// Identifier for the chunk at position `index` of an ingestion run.
pub fn chunk_id(index: usize) -> String {
    format!("{}{}", CHUNK_ID_PREFIX, index)
}

/// Inverse of [`chunk_id`]. Returns `None` for ids not produced by it.
pub fn parse_chunk_index(id: &str) -> Option<usize> {
    let digits = id.strip_prefix(CHUNK_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn clean_metadata_drops_null_and_empty_strings() {
        let mut md = Metadata::new();
        md.insert("source".into(), json!("manual.pdf"));
        md.insert("producer".into(), json!(""));
        md.insert("author".into(), serde_json::Value::Null);
        md.insert("page".into(), json!(0));
        md.insert("encrypted".into(), json!(false));
        md.insert("label".into(), json!(" "));

        let cleaned = clean_metadata(md);
        let keys: Vec<&str> = cleaned.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["encrypted", "label", "page", "source"]);
        assert_eq!(cleaned["page"], json!(0));
    }

    #[test]
    fn chunk_ids_follow_split_order() {
        assert_eq!(chunk_id(0), "doc-0");
        assert_eq!(chunk_id(41), "doc-41");
        assert_eq!(parse_chunk_index("doc-41"), Some(41));
    }

    #[test]
    fn foreign_ids_are_not_parsed() {
        assert_eq!(parse_chunk_index("doc-"), None);
        assert_eq!(parse_chunk_index("doc-1a"), None);
        assert_eq!(parse_chunk_index("doc--1"), None);
        assert_eq!(parse_chunk_index("chunk-3"), None);
    }
}
