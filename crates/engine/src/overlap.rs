//! Cross-segment overlap injection for retrieval continuity.

/// A segment plus the number of tokens prepended from its predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Overlapped {
    pub text: String,
    pub overlap_tokens: usize,
}

/// Prepend the trailing `overlap` tokens of each segment to its successor.
///
/// The prefix is always taken from the *pre-overlap* previous segment, so
/// overlap windows do not compound across a chain of short segments. The
/// recorded count may be smaller than `overlap` when the previous segment
/// has fewer tokens. Overlap is additive on top of the max bound; nothing
/// is re-checked here.
pub(crate) fn inject(segments: Vec<String>, overlap: usize) -> Vec<Overlapped> {
    if overlap == 0 {
        return segments
            .into_iter()
            .map(|text| Overlapped {
                text,
                overlap_tokens: 0,
            })
            .collect();
    }

    let mut out = Vec::with_capacity(segments.len());
    for (i, segment) in segments.iter().enumerate() {
        if i == 0 {
            out.push(Overlapped {
                text: segment.clone(),
                overlap_tokens: 0,
            });
            continue;
        }
        let prev_words: Vec<&str> = segments[i - 1].split_whitespace().collect();
        let take = overlap.min(prev_words.len());
        if take == 0 {
            out.push(Overlapped {
                text: segment.clone(),
                overlap_tokens: 0,
            });
            continue;
        }
        let prefix = prev_words[prev_words.len() - take..].join(" ");
        out.push(Overlapped {
            text: format!("{prefix} {segment}"),
            overlap_tokens: take,
        });
    }
    out
}
