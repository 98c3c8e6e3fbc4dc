//! Chunking-rule table: YAML schema, loader, and resolver.
//!
//! This crate provides:
//! - YAML-based rule definition with serde deserialization
//! - One-shot file loader with per-entry validation
//! - Document-type resolution with a configurable default fallback

pub mod schema;
pub mod store;

pub use schema::RuleEntry;
pub use store::{FallbackPolicy, Result, RuleSet, RuleStoreError};
