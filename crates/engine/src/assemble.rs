//! Final chunk assembly: ids, metadata enrichment, token counts.

use uuid::Uuid;

use chunkmill_core::{meta_keys, Chunk, ChunkRule, DocMeta};

use crate::overlap::Overlapped;
use crate::token::TokenCounter;

/// Wrap overlapped segments into [`Chunk`] records.
///
/// Each chunk gets a fresh id, a per-chunk copy of the document metadata
/// enriched with positional and strategy provenance, and a token count over
/// the final (overlapped) text. Whitespace-only segments are dropped; no
/// bound enforcement happens here; upstream already guaranteed it.
pub(crate) fn assemble(
    overlapped: Vec<Overlapped>,
    doc_id: &str,
    meta: &DocMeta,
    rule: &ChunkRule,
    counter: TokenCounter,
) -> Vec<Chunk> {
    let kept: Vec<Overlapped> = overlapped
        .into_iter()
        .filter(|o| !o.text.trim().is_empty())
        .collect();
    let total = kept.len();

    kept.into_iter()
        .enumerate()
        .map(|(index, o)| {
            let mut chunk_meta = meta.clone();
            chunk_meta.insert(meta_keys::CHUNK_INDEX, index);
            chunk_meta.insert(meta_keys::TOTAL_CHUNKS, total);
            chunk_meta.insert(meta_keys::OVERLAP_TOKENS, o.overlap_tokens);
            chunk_meta.insert(meta_keys::CHUNKING_STRATEGY, rule.strategy.as_str());

            Chunk {
                id: Uuid::new_v4().simple().to_string(),
                doc_id: doc_id.to_string(),
                token_count: counter.count(&o.text),
                chunk_index: index,
                overlap_tokens: o.overlap_tokens,
                meta: chunk_meta,
                text: o.text,
            }
        })
        .collect()
}

/// Generated fallback when the caller supplied no `doc_id`.
pub(crate) fn generated_doc_id() -> String {
    Uuid::new_v4().simple().to_string()
}
