//! Engine entry point: rule-driven splitting of `(text, metadata)` inputs.

use tracing::debug;

use chunkmill_core::{Chunk, DocMeta};
use chunkmill_rules::{RuleSet, RuleStoreError};

use crate::assemble;
use crate::bounds;
use crate::overlap;
use crate::strategies::{StrategyError, StrategyRegistry};
use crate::token::TokenCounter;

/// Errors surfaced by a split call or by engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum ChunkError {
    /// Rule resolution or rule-table loading failed.
    #[error(transparent)]
    Rule(#[from] RuleStoreError),

    /// Strategy registration failed.
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// Rule-driven splitter producing [`Chunk`] records.
///
/// Holds the immutable rule table, the strategy dispatch table, and the
/// token counter. All per-call state is local, so one `Chunker` can be
/// shared by reference across threads and split calls for different
/// documents run in parallel without coordination. There is no cancellation
/// semantic; a call runs to completion or fails synchronously.
#[derive(Debug)]
pub struct Chunker {
    rules: RuleSet,
    registry: StrategyRegistry,
    counter: TokenCounter,
}

impl Chunker {
    /// Build an engine over an already-loaded rule table.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            registry: StrategyRegistry::new(),
            counter: TokenCounter::default(),
        }
    }

    /// Swap the token counter. All bound computations go through it, so the
    /// swap applies consistently to min/max/overlap semantics.
    pub fn with_token_counter(mut self, counter: TokenCounter) -> Self {
        self.counter = counter;
        self
    }

    pub fn token_counter(&self) -> TokenCounter {
        self.counter
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Register a custom segmentation strategy under a unique name.
    pub fn register_strategy(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) -> Result<(), ChunkError> {
        self.registry.register(name, f)?;
        Ok(())
    }

    /// Direct access to the strategy table (e.g. for explicit overrides).
    pub fn registry_mut(&mut self) -> &mut StrategyRegistry {
        &mut self.registry
    }

    /// Split one document into chunks according to its type's rule.
    ///
    /// `meta.doc_type` drives rule resolution (absent → default path);
    /// `meta.doc_id` is used verbatim when present, else generated. Empty
    /// or whitespace-only text yields an empty chunk list, not an error.
    pub fn split(&self, text: &str, meta: &DocMeta) -> Result<Vec<Chunk>, ChunkError> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let doc_type = meta.doc_type().unwrap_or_default();
        let rule = self.rules.resolve(&doc_type)?;
        let doc_id = meta
            .doc_id()
            .map(str::to_string)
            .unwrap_or_else(assemble::generated_doc_id);

        let segments = self.registry.segment(&rule.strategy, text);
        let bounded = bounds::enforce(segments, rule, self.counter);
        let overlapped = overlap::inject(bounded, rule.overlap);
        let chunks = assemble::assemble(overlapped, &doc_id, meta, rule, self.counter);

        debug!(
            doc_id = %doc_id,
            doc_type = %doc_type,
            strategy = %rule.strategy,
            chunks = chunks.len(),
            "split document"
        );
        Ok(chunks)
    }

    /// Split a batch of documents, isolating per-document failures.
    ///
    /// Successful chunks are returned in input order; failures are reported
    /// with the index of the offending document. The engine never swallows
    /// an error on a batch's behalf; every failure is in the report.
    pub fn split_batch(
        &self,
        docs: &[(String, DocMeta)],
    ) -> (Vec<Chunk>, Vec<(usize, ChunkError)>) {
        let mut chunks = Vec::new();
        let mut failures = Vec::new();
        for (index, (text, meta)) in docs.iter().enumerate() {
            match self.split(text, meta) {
                Ok(batch) => chunks.extend(batch),
                Err(e) => failures.push((index, e)),
            }
        }
        (chunks, failures)
    }
}
