//! Rule-driven chunking engine.
//!
//! Splits extracted document text into bounded, overlapping chunks suitable
//! for embedding, dispatching a per-document-type segmentation strategy
//! (paragraphs, slides, email blocks/threads, sentences, rows), then
//! enforcing token bounds and injecting cross-chunk overlap.
//!
//! Pipeline: rule resolution → segmentation → bounds enforcement → overlap
//! injection → chunk assembly. See [`Chunker::split`].

mod assemble;
mod bounds;
mod chunker;
mod overlap;
mod strategies;
mod token;

pub use chunker::{ChunkError, Chunker};
pub use strategies::{StrategyError, StrategyRegistry};
pub use token::TokenCounter;

pub use chunkmill_core::{meta_keys, Chunk, ChunkRule, DocMeta};
pub use chunkmill_rules::{FallbackPolicy, RuleSet};
