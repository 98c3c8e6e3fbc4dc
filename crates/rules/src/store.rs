//! Loaded, validated rule table with document-type resolution.
//!
//! The table is constructed once (from a YAML file or an in-memory map) and
//! is immutable afterwards; callers hand it to the engine by value and share
//! the engine by reference across threads.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use chunkmill_core::rule::{ChunkRule, RuleValidationError};

use crate::schema::RuleEntry;

/// Rule-table key consulted when a document type has no entry of its own.
pub const DEFAULT_KEY: &str = "default";

// ── Error type ──────────────────────────────────────────────────────

/// Errors that can occur while loading or resolving chunk rules.
#[derive(Debug, thiserror::Error)]
pub enum RuleStoreError {
    /// Filesystem I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parse/deserialization error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A rule entry failed [`ChunkRule`] validation.
    #[error("invalid rule for '{doc_type}': {source}")]
    Validation {
        doc_type: String,
        #[source]
        source: RuleValidationError,
    },

    /// No entry for the document type, no `default` entry, strict policy.
    #[error("no rule for document type '{0}' and no 'default' entry")]
    RuleNotFound(String),
}

/// Result alias for rule-store operations.
pub type Result<T> = std::result::Result<T, RuleStoreError>;

// ── Fallback policy ─────────────────────────────────────────────────

/// What [`RuleSet::resolve`] does when neither the document type nor the
/// `default` key has an entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FallbackPolicy {
    /// Return [`ChunkRule::builtin_default`] with a debug diagnostic.
    #[default]
    BuiltinDefault,
    /// Fail with [`RuleStoreError::RuleNotFound`].
    Strict,
}

// ── Rule set ────────────────────────────────────────────────────────

/// Immutable rule table keyed by lower-cased document type.
///
/// Built once under caller control; there is no live reload. Entry order
/// from the source file is preserved for [`RuleSet::doc_types`].
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: IndexMap<String, ChunkRule>,
    fallback: FallbackPolicy,
    builtin_default: ChunkRule,
}

impl RuleSet {
    /// Load and validate a rule table from a YAML file.
    ///
    /// Every entry must validate; a malformed entry fails the whole load
    /// with the offending document type named, rather than being skipped.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let set = Self::from_yaml_str(&contents)?;
        info!(path = %path.display(), entries = set.len(), "loaded chunk rules");
        Ok(set)
    }

    /// Parse a rule table from YAML text. An empty document yields an empty
    /// table (resolution then follows the fallback policy).
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let raw: Option<IndexMap<String, RuleEntry>> = serde_yaml::from_str(contents)?;
        let mut rules = IndexMap::new();
        for (doc_type, entry) in raw.unwrap_or_default() {
            let key = doc_type.to_lowercase();
            let rule = entry
                .into_rule()
                .map_err(|source| RuleStoreError::Validation {
                    doc_type: doc_type.clone(),
                    source,
                })?;
            if rules.insert(key, rule).is_some() {
                warn!(doc_type = %doc_type, "duplicate rule entry, later definition wins");
            }
        }
        Ok(Self::from_table(rules))
    }

    /// Build from an already-validated in-memory table. Keys are lower-cased.
    pub fn from_table(table: IndexMap<String, ChunkRule>) -> Self {
        let rules = table
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self {
            rules,
            fallback: FallbackPolicy::default(),
            builtin_default: ChunkRule::builtin_default(),
        }
    }

    /// An empty table; every resolution follows the fallback policy.
    pub fn empty() -> Self {
        Self::from_table(IndexMap::new())
    }

    /// Set the behavior for document types with no entry and no default.
    pub fn with_fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback = policy;
        self
    }

    /// Resolve the rule for a document type.
    ///
    /// Lookup is by lower-cased label; a miss falls back to the `default`
    /// entry, then to the configured [`FallbackPolicy`].
    pub fn resolve(&self, doc_type: &str) -> Result<&ChunkRule> {
        let key = doc_type.to_lowercase();
        if let Some(rule) = self.rules.get(&key) {
            return Ok(rule);
        }
        if let Some(rule) = self.rules.get(DEFAULT_KEY) {
            debug!(doc_type = %doc_type, "no dedicated rule, using default entry");
            return Ok(rule);
        }
        match self.fallback {
            FallbackPolicy::BuiltinDefault => {
                debug!(doc_type = %doc_type, "no rule entry, using built-in default");
                Ok(&self.builtin_default)
            }
            FallbackPolicy::Strict => Err(RuleStoreError::RuleNotFound(doc_type.to_string())),
        }
    }

    /// Direct table lookup without any fallback.
    pub fn get(&self, doc_type: &str) -> Option<&ChunkRule> {
        self.rules.get(&doc_type.to_lowercase())
    }

    /// Configured document types, in file order.
    pub fn doc_types(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChunkRule)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
