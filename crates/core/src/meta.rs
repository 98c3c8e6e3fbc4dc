//! Document metadata: an ordered pass-through map with a small typed subset.
//!
//! Loaders attach arbitrary keys (source path, page numbers, sheet names)
//! that the engine copies verbatim into every chunk. Only two keys are read
//! by the engine itself: `doc_type` (drives rule resolution) and `doc_id`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known metadata keys.
pub mod meta_keys {
    /// Document-type label driving rule resolution (e.g. "pdf", "eml").
    pub const DOC_TYPE: &str = "doc_type";
    /// Caller-supplied document identifier.
    pub const DOC_ID: &str = "doc_id";
    /// Zero-based chunk position, written by the assembler.
    pub const CHUNK_INDEX: &str = "chunk_index";
    /// Number of chunks produced from the same input, written by the assembler.
    pub const TOTAL_CHUNKS: &str = "total_chunks";
    /// Tokens prepended from the previous chunk, written by the assembler.
    pub const OVERLAP_TOKENS: &str = "overlap_tokens";
    /// Name of the strategy that produced the chunk, written by the assembler.
    pub const CHUNKING_STRATEGY: &str = "chunking_strategy";
}

/// Ordered key→value metadata attached to a document and its chunks.
///
/// Insertion order is preserved so chunks serialize stably. Values are raw
/// JSON values; the engine never interprets anything beyond the typed
/// accessors below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocMeta(IndexMap<String, Value>);

impl DocMeta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for the one key every caller sets.
    pub fn with_doc_type(doc_type: impl Into<String>) -> Self {
        let mut meta = Self::new();
        meta.insert(meta_keys::DOC_TYPE, doc_type.into());
        meta
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The document-type label, lower-cased. `None` when absent or not a
    /// string; rule resolution then takes the default path.
    pub fn doc_type(&self) -> Option<String> {
        self.0
            .get(meta_keys::DOC_TYPE)
            .and_then(Value::as_str)
            .map(str::to_lowercase)
    }

    /// The caller-supplied document id, used verbatim when present.
    pub fn doc_id(&self) -> Option<&str> {
        self.0.get(meta_keys::DOC_ID).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<IndexMap<String, Value>> for DocMeta {
    fn from(map: IndexMap<String, Value>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, Value)> for DocMeta {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_type_is_lowercased() {
        let meta = DocMeta::with_doc_type("PDF");
        assert_eq!(meta.doc_type().as_deref(), Some("pdf"));
    }

    #[test]
    fn missing_keys_return_none() {
        let meta = DocMeta::new();
        assert!(meta.doc_type().is_none());
        assert!(meta.doc_id().is_none());
    }

    #[test]
    fn non_string_doc_type_is_ignored() {
        let meta = DocMeta::new().with(meta_keys::DOC_TYPE, 42);
        assert!(meta.doc_type().is_none());
    }

    #[test]
    fn opaque_keys_pass_through_in_order() {
        let meta = DocMeta::with_doc_type("eml")
            .with("source", "inbox/a.eml")
            .with("page", 3);
        let keys: Vec<&str> = meta.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["doc_type", "source", "page"]);
        assert_eq!(meta.get("page").and_then(Value::as_u64), Some(3));
    }
}
