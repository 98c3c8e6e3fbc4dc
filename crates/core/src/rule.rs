//! Per-document-type chunking configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a [`ChunkRule`] is constructed with inconsistent bounds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleValidationError {
    /// `min_tokens` exceeds `max_tokens` while both are nonzero.
    #[error("min_tokens ({min}) exceeds max_tokens ({max})")]
    MinExceedsMax { min: usize, max: usize },

    /// The strategy name is empty.
    #[error("strategy name must not be empty")]
    EmptyStrategy,
}

/// Configuration for how to chunk one document type.
///
/// A rule is resolved once per document type and reused across split calls.
/// Bounds of `0` disable the corresponding limit. Construction goes through
/// [`ChunkRule::new`] (also when deserializing), so an invalid rule is
/// rejected rather than clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRule")]
pub struct ChunkRule {
    /// Name of the segmentation strategy (e.g. "by_paragraph", "by_slide").
    pub strategy: String,
    /// Segments below this token count are merged forward. `0` disables.
    pub min_tokens: usize,
    /// Segments above this token count are split. `0` disables (unbounded).
    pub max_tokens: usize,
    /// Trailing tokens of chunk i-1 prepended to chunk i.
    pub overlap: usize,
}

impl ChunkRule {
    /// Validating constructor.
    pub fn new(
        strategy: impl Into<String>,
        min_tokens: usize,
        max_tokens: usize,
        overlap: usize,
    ) -> Result<Self, RuleValidationError> {
        let strategy = strategy.into();
        if strategy.trim().is_empty() {
            return Err(RuleValidationError::EmptyStrategy);
        }
        if min_tokens > max_tokens && max_tokens > 0 {
            return Err(RuleValidationError::MinExceedsMax {
                min: min_tokens,
                max: max_tokens,
            });
        }
        Ok(Self {
            strategy,
            min_tokens,
            max_tokens,
            overlap,
        })
    }

    /// The rule applied when no table entry matches and the resolver is
    /// configured to fall back to a built-in: paragraph splitting with
    /// 50..300 token bounds and 20 tokens of overlap.
    pub fn builtin_default() -> Self {
        Self {
            strategy: "by_paragraph".to_string(),
            min_tokens: 50,
            max_tokens: 300,
            overlap: 20,
        }
    }

    /// True when neither bound is active.
    pub fn is_unbounded(&self) -> bool {
        self.min_tokens == 0 && self.max_tokens == 0
    }
}

/// Mirror struct routing deserialization through validation.
#[derive(Deserialize)]
struct RawRule {
    strategy: String,
    #[serde(default)]
    min_tokens: usize,
    #[serde(default)]
    max_tokens: usize,
    #[serde(default)]
    overlap: usize,
}

impl TryFrom<RawRule> for ChunkRule {
    type Error = RuleValidationError;

    fn try_from(raw: RawRule) -> Result<Self, Self::Error> {
        ChunkRule::new(raw.strategy, raw.min_tokens, raw.max_tokens, raw.overlap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_rule_constructs() {
        let rule = ChunkRule::new("by_paragraph", 50, 300, 20).unwrap();
        assert_eq!(rule.strategy, "by_paragraph");
        assert_eq!(rule.min_tokens, 50);
        assert_eq!(rule.max_tokens, 300);
        assert_eq!(rule.overlap, 20);
    }

    #[test]
    fn min_above_max_rejected() {
        let err = ChunkRule::new("by_paragraph", 400, 300, 0).unwrap_err();
        assert_eq!(err, RuleValidationError::MinExceedsMax { min: 400, max: 300 });
    }

    #[test]
    fn zero_max_disables_the_bound_check() {
        // max_tokens == 0 means unbounded, so any min is fine.
        let rule = ChunkRule::new("by_sentence", 400, 0, 0).unwrap();
        assert_eq!(rule.min_tokens, 400);
    }

    #[test]
    fn empty_strategy_rejected() {
        let err = ChunkRule::new("  ", 0, 0, 0).unwrap_err();
        assert_eq!(err, RuleValidationError::EmptyStrategy);
    }

    #[test]
    fn deserialization_validates() {
        let ok: ChunkRule =
            serde_json::from_str(r#"{"strategy":"by_slide","max_tokens":200}"#).unwrap();
        assert_eq!(ok.strategy, "by_slide");
        assert_eq!(ok.min_tokens, 0);

        let bad = serde_json::from_str::<ChunkRule>(
            r#"{"strategy":"by_slide","min_tokens":10,"max_tokens":5}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn builtin_default_is_valid() {
        let rule = ChunkRule::builtin_default();
        assert_eq!(rule.strategy, "by_paragraph");
        assert!(!rule.is_unbounded());
    }
}
