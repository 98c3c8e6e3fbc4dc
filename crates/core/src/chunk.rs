//! Chunk output type.

use serde::{Deserialize, Serialize};

use crate::meta::DocMeta;

/// A bounded unit of text with provenance metadata, the engine's output.
///
/// Chunks are created fresh per split call and handed straight to the
/// embedding stage; nothing mutates them after construction. `meta` is a
/// per-chunk copy of the caller's document metadata enriched with
/// `chunk_index`, `total_chunks`, `overlap_tokens` and `chunking_strategy`,
/// so a downstream consumer editing one chunk's metadata cannot affect
/// another's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Globally unique chunk identifier.
    pub id: String,
    /// Identifier of the owning document.
    pub doc_id: String,
    /// Final chunk text, including any injected overlap prefix.
    pub text: String,
    /// Enriched copy of the document metadata.
    pub meta: DocMeta,
    /// Zero-based position among chunks from the same input.
    pub chunk_index: usize,
    /// Tokens prepended from the previous chunk (0 for the first).
    pub overlap_tokens: usize,
    /// Token count of `text` as measured by the configured counter.
    pub token_count: usize,
}
