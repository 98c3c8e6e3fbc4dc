pub mod chunk;
pub mod meta;
pub mod rule;

pub use chunk::Chunk;
pub use meta::{meta_keys, DocMeta};
pub use rule::{ChunkRule, RuleValidationError};
