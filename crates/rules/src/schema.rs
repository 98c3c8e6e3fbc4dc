//! YAML schema for chunk-rule files.
//!
//! A rule file is a single YAML mapping from document-type label to rule
//! fields, with an optional `default` entry:
//!
//! ```yaml
//! pdf:
//!   strategy: by_paragraph
//!   min_tokens: 50
//!   max_tokens: 300
//!   overlap: 20
//! csv:
//!   strategy: split_on_rows
//!   min_tokens: 150
//!   max_tokens: 800
//!   overlap: 20
//!   notes: rows are pre-flattened to lines by the loader
//! default:
//!   strategy: by_paragraph
//!   min_tokens: 50
//!   max_tokens: 300
//!   overlap: 20
//! ```

use serde::{Deserialize, Serialize};

use chunkmill_core::rule::{ChunkRule, RuleValidationError};

/// One entry in a chunk-rules YAML file, before validation.
///
/// Bounds default to `0` (disabled) when omitted. `notes` is free-text for
/// rule authors and is not carried into the validated [`ChunkRule`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    pub strategy: String,
    #[serde(default)]
    pub min_tokens: usize,
    #[serde(default)]
    pub max_tokens: usize,
    #[serde(default)]
    pub overlap: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RuleEntry {
    /// Validate into an engine-facing [`ChunkRule`].
    pub fn into_rule(self) -> Result<ChunkRule, RuleValidationError> {
        ChunkRule::new(self.strategy, self.min_tokens, self.max_tokens, self.overlap)
    }
}

impl From<ChunkRule> for RuleEntry {
    fn from(rule: ChunkRule) -> Self {
        Self {
            strategy: rule.strategy,
            min_tokens: rule.min_tokens,
            max_tokens: rule.max_tokens,
            overlap: rule.overlap,
            notes: None,
        }
    }
}
