//! Token-bound enforcement: split oversized segments, merge undersized ones.

use chunkmill_core::ChunkRule;

use crate::token::TokenCounter;

/// Bring candidate segments within the rule's token bounds.
///
/// Two passes: oversize splitting (when `max_tokens > 0`), then undersize
/// merging (when `min_tokens > 0`). A merge that would overshoot
/// `max_tokens` is re-split rather than rejected, so the output stays
/// deterministic. A trailing segment below `min_tokens` with nothing left
/// to merge into is kept; trailing content is never discarded. Ordering is
/// preserved throughout; whitespace-only segments are dropped even when
/// both bounds are disabled.
pub(crate) fn enforce(
    segments: Vec<String>,
    rule: &ChunkRule,
    counter: TokenCounter,
) -> Vec<String> {
    let mut bounded: Vec<String> = Vec::with_capacity(segments.len());

    for segment in segments {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        if rule.max_tokens > 0 && counter.count(segment) > rule.max_tokens {
            bounded.extend(split_oversized(segment, rule.max_tokens, counter));
        } else {
            bounded.push(segment.to_string());
        }
    }

    if rule.min_tokens > 0 {
        merge_undersized(bounded, rule, counter)
    } else {
        bounded
    }
}

/// Greedily pack whitespace-delimited tokens into spans of at most
/// `max_tokens`. No token is dropped: rejoining the pieces reproduces the
/// input token sequence. A single token wider than the whole budget is
/// emitted alone rather than split mid-word.
fn split_oversized(text: &str, max_tokens: usize, counter: TokenCounter) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut buf: Vec<&str> = Vec::new();
    let mut buf_tokens = 0usize;

    for word in text.split_whitespace() {
        let word_tokens = counter.count(word).max(1);
        if buf_tokens + word_tokens > max_tokens && !buf.is_empty() {
            pieces.push(buf.join(" "));
            buf.clear();
            buf_tokens = 0;
        }
        buf.push(word);
        buf_tokens += word_tokens;
    }
    if !buf.is_empty() {
        pieces.push(buf.join(" "));
    }
    pieces
}

/// Merge runs of undersized segments forward with single-space joins.
fn merge_undersized(segments: Vec<String>, rule: &ChunkRule, counter: TokenCounter) -> Vec<String> {
    let mut out = Vec::with_capacity(segments.len());
    let mut iter = segments.into_iter();
    let Some(mut current) = iter.next() else {
        return out;
    };

    for next in iter {
        if counter.count(&current) >= rule.min_tokens {
            out.push(std::mem::replace(&mut current, next));
            continue;
        }
        let merged = format!("{current} {next}");
        if rule.max_tokens == 0 || counter.count(&merged) <= rule.max_tokens {
            current = merged;
        } else {
            // Overshooting merge: re-split, emit the full pieces, and keep
            // accumulating from the remainder.
            let mut pieces = split_oversized(&merged, rule.max_tokens, counter);
            let last = pieces.pop().expect("split of non-empty text yields pieces");
            out.extend(pieces);
            current = last;
        }
    }
    out.push(current);
    out
}
