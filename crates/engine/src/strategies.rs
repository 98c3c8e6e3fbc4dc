//! Segmentation strategies and the name → segmenter dispatch table.
//!
//! A strategy turns raw document text into an ordered sequence of candidate
//! segments; token bounds and overlap are applied downstream. Built-ins
//! cover paragraphs, slides, email blocks/threads, sentences, and
//! row-per-line text. Custom segmenters register under a unique name.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// One-or-more blank lines separating paragraphs.
static PARA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

/// Localized reply header, e.g. `On Mon, Jan 5, Alice wrote:`.
static WROTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^On\s+(.+?)\s+wrote:\s*$").expect("valid reply-header regex"));

/// Forwarded-message header line.
static FROM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^From:").expect("valid from regex"));

/// `--- Original Message ---` style separators.
static ORIG_MSG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[-─]{3,}\s*Original Message\s*[-─]{3,}").expect("valid separator regex")
});

/// Horizontal-rule section separators inside an email body.
static SECTION_SEP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*[-_=]{3,}\s*\n").expect("valid section regex"));

/// Slide-boundary marker some loaders insert instead of a form feed.
const SLIDE_MARKER: &str = "---SLIDE---";

// ── Built-in segmenters ─────────────────────────────────────────────

/// Split on blank lines; trim and drop empty paragraphs.
pub(crate) fn by_paragraph(text: &str) -> Vec<String> {
    let normalized = text.replace("\r\n", "\n");
    PARA_RE
        .split(&normalized)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Split presentation text by slides: form feed first, then the literal
/// marker, else the whole text as a single slide.
fn by_slide(text: &str) -> Vec<String> {
    let slides: Vec<&str> = if text.contains('\u{c}') {
        text.split('\u{c}').collect()
    } else if text.contains(SLIDE_MARKER) {
        text.split(SLIDE_MARKER).collect()
    } else {
        vec![text]
    };
    slides
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Excise quoted-reply content, then split what remains into blocks.
///
/// Quoted content is any line with leading `>` markers, a reply header
/// (`On ... wrote:`), a forwarded `From:` header, or an `Original Message`
/// separator, plus the blank lines inside that quote block. The surviving
/// text is split on horizontal-rule separators and paragraphs.
fn by_email_block(text: &str) -> Vec<String> {
    let mut cleaned: Vec<&str> = Vec::new();
    let mut in_quote = false;

    for line in text.lines() {
        let quote_markers = line.len() - line.trim_start_matches('>').len();
        let is_quote_header =
            WROTE_RE.is_match(line) || FROM_RE.is_match(line) || ORIG_MSG_RE.is_match(line);

        if quote_markers > 0 || is_quote_header {
            in_quote = true;
            continue;
        }
        if in_quote && line.trim().is_empty() {
            // Blank line may still belong to the quote block.
            continue;
        }
        if in_quote {
            in_quote = false;
        }
        cleaned.push(line);
    }

    let cleaned_text = cleaned.join("\n");
    let mut blocks = Vec::new();
    for section in SECTION_SEP_RE.split(&cleaned_text) {
        for para in PARA_RE.split(section) {
            let para = para.trim();
            if !para.is_empty() {
                blocks.push(para.to_string());
            }
        }
    }

    if blocks.is_empty() {
        let tail = cleaned_text.trim();
        if tail.is_empty() {
            Vec::new()
        } else {
            vec![tail.to_string()]
        }
    } else {
        blocks
    }
}

/// Reconstruct the distinct human-authored messages of a reply thread.
///
/// Each `On <sender> wrote:` header closes the message being accumulated,
/// attributes the next one to `<sender>` via a `[Reply from: ...]` tag, and
/// skips the quoted lines that follow the header. Without any thread
/// markers the text is handed to [`by_email_block`] instead.
fn by_email_thread(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut messages: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_sender: Option<String> = None;
    let mut saw_header = false;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];

        if let Some(caps) = WROTE_RE.captures(line) {
            saw_header = true;
            flush_message(&mut current, current_sender.as_deref(), &mut messages);
            current_sender = Some(caps[1].to_string());

            // Skip the quoted content following the header.
            let mut j = i + 1;
            while j < lines.len() && (lines[j].starts_with('>') || lines[j].trim().is_empty()) {
                j += 1;
            }
            i = j;
            continue;
        }

        if !line.starts_with('>') {
            current.push(line);
        }
        i += 1;
    }
    flush_message(&mut current, current_sender.as_deref(), &mut messages);

    if !saw_header || messages.is_empty() {
        return by_email_block(text);
    }
    messages
}

fn flush_message(current: &mut Vec<&str>, sender: Option<&str>, messages: &mut Vec<String>) {
    let msg = current.join("\n").trim().to_string();
    current.clear();
    if msg.is_empty() {
        return;
    }
    match sender {
        Some(s) => messages.push(format!("[Reply from: {s}]\n{msg}")),
        None => messages.push(msg),
    }
}

/// Split on sentence-terminal punctuation followed by whitespace, keeping
/// the terminator attached to its sentence.
fn by_sentence(text: &str) -> Vec<String> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            let mut j = i + 1;
            if j < bytes.len() && bytes[j].is_ascii_whitespace() {
                let sentence = text[start..=i].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                while j < bytes.len() && bytes[j].is_ascii_whitespace() {
                    j += 1;
                }
                start = j;
                i = j;
                continue;
            }
        }
        i += 1;
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// One segment per non-blank line (tabular text pre-flattened to rows).
fn split_on_rows(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Registry ────────────────────────────────────────────────────────

/// Errors from strategy registration.
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    /// The name is already taken (built-in or custom). Shadowing requires
    /// [`StrategyRegistry::override_strategy`].
    #[error("strategy '{0}' is already registered")]
    Duplicate(String),
}

type SegmentFn = Box<dyn Fn(&str) -> Vec<String> + Send + Sync>;

/// Name → segmenter dispatch table, pre-populated with the built-ins.
///
/// Rule files reference strategies by name. An unknown name falls back to
/// `by_paragraph` with a warning, at the single dispatch point below so the
/// fallback cannot diverge between call sites.
pub struct StrategyRegistry {
    table: HashMap<String, SegmentFn>,
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        let mut registry = Self {
            table: HashMap::new(),
        };
        registry.install("by_paragraph", by_paragraph);
        // Alias kept for rule files written against the older name.
        registry.install("split_on_blank_lines", by_paragraph);
        registry.install("by_slide", by_slide);
        registry.install("by_email_block", by_email_block);
        registry.install("by_email_thread", by_email_thread);
        registry.install("by_sentence", by_sentence);
        registry.install("split_on_rows", split_on_rows);
        registry
    }
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn install(&mut self, name: &str, f: fn(&str) -> Vec<String>) {
        self.table.insert(name.to_string(), Box::new(f));
    }

    /// Register a custom segmenter under a unique name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) -> Result<(), StrategyError> {
        let name = name.into();
        if self.table.contains_key(&name) {
            return Err(StrategyError::Duplicate(name));
        }
        self.table.insert(name, Box::new(f));
        Ok(())
    }

    /// Replace a segmenter, built-in or custom. Explicit by design; plain
    /// [`register`](Self::register) refuses to shadow.
    pub fn override_strategy(
        &mut self,
        name: impl Into<String>,
        f: impl Fn(&str) -> Vec<String> + Send + Sync + 'static,
    ) {
        self.table.insert(name.into(), Box::new(f));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Registered strategy names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the named strategy over `text`.
    ///
    /// Unknown names fall back to `by_paragraph` with a diagnostic.
    pub fn segment(&self, strategy: &str, text: &str) -> Vec<String> {
        match self.table.get(strategy) {
            Some(f) => f(text),
            None => {
                warn!(strategy = %strategy, "unknown chunking strategy, falling back to by_paragraph");
                by_paragraph(text)
            }
        }
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("strategies", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Paragraphs ──────────────────────────────────────────────────

    #[test]
    fn paragraphs_split_on_blank_lines() {
        let segments = by_paragraph("First paragraph.\n\nSecond paragraph.\n\n\nThird.");
        assert_eq!(segments, vec!["First paragraph.", "Second paragraph.", "Third."]);
    }

    #[test]
    fn paragraphs_normalize_crlf() {
        let segments = by_paragraph("A.\r\n\r\nB.");
        assert_eq!(segments, vec!["A.", "B."]);
    }

    #[test]
    fn paragraphs_drop_whitespace_only() {
        let segments = by_paragraph("A.\n\n   \n\nB.");
        assert_eq!(segments, vec!["A.", "B."]);
    }

    // ── Slides ──────────────────────────────────────────────────────

    #[test]
    fn slides_split_on_form_feed() {
        let segments = by_slide("Slide one\u{c}Slide two\u{c}Slide three");
        assert_eq!(segments, vec!["Slide one", "Slide two", "Slide three"]);
    }

    #[test]
    fn slides_split_on_literal_marker() {
        let segments = by_slide("Intro---SLIDE---Body---SLIDE---Summary");
        assert_eq!(segments, vec!["Intro", "Body", "Summary"]);
    }

    #[test]
    fn slides_without_markers_stay_whole() {
        let segments = by_slide("Just one slide of text.");
        assert_eq!(segments, vec!["Just one slide of text."]);
    }

    // ── Email blocks ────────────────────────────────────────────────

    #[test]
    fn email_block_excises_quoted_lines() {
        let text = "Latest reply text here.\n\n> quoted line one\n> quoted line two\n\nMore unquoted text.";
        let segments = by_email_block(text);
        assert_eq!(segments, vec!["Latest reply text here.", "More unquoted text."]);
    }

    #[test]
    fn email_block_excises_reply_header_and_quote() {
        let text = "Thanks, sounds good.\n\nOn Mon, Jan 5, Alice wrote:\n> earlier message\n> more of it\n";
        let segments = by_email_block(text);
        assert_eq!(segments, vec!["Thanks, sounds good."]);
    }

    #[test]
    fn email_block_splits_on_separator_rules() {
        let text = "Part one of the email.\n\n-----\n\nPart two after the rule.";
        let segments = by_email_block(text);
        assert_eq!(segments, vec!["Part one of the email.", "Part two after the rule."]);
    }

    #[test]
    fn email_block_fully_quoted_yields_nothing() {
        let segments = by_email_block("> everything here\n> is quoted");
        assert!(segments.is_empty());
    }

    // ── Email threads ───────────────────────────────────────────────

    #[test]
    fn email_thread_reconstructs_messages_with_senders() {
        let text = "Top reply, latest in the thread.\n\
                    \n\
                    On Tue, Feb 3, Bob wrote:\n\
                    > original question text\n\
                    \n\
                    Middle message answering Bob.\n\
                    On Mon, Feb 2, Carol wrote:\n\
                    > even earlier text\n\
                    Closing message from Carol's thread.";
        let segments = by_email_thread(text);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], "Top reply, latest in the thread.");
        assert!(segments[1].starts_with("[Reply from: Tue, Feb 3, Bob]"));
        assert!(segments[1].contains("Middle message answering Bob."));
        assert!(segments[2].starts_with("[Reply from: Mon, Feb 2, Carol]"));
    }

    #[test]
    fn email_thread_without_markers_falls_back_to_blocks() {
        let text = "Plain message, first paragraph.\n\n> a stray quote\n\nSecond paragraph.";
        let segments = by_email_thread(text);
        // by_email_block semantics: quote excised, paragraphs kept.
        assert_eq!(segments, vec!["Plain message, first paragraph.", "Second paragraph."]);
    }

    // ── Sentences ───────────────────────────────────────────────────

    #[test]
    fn sentences_keep_their_terminators() {
        let segments = by_sentence("First sentence. Second one! Third?");
        assert_eq!(segments, vec!["First sentence.", "Second one!", "Third?"]);
    }

    #[test]
    fn sentence_punctuation_without_space_does_not_split() {
        let segments = by_sentence("Version 1.2 shipped. Done");
        assert_eq!(segments, vec!["Version 1.2 shipped.", "Done"]);
    }

    // ── Rows ────────────────────────────────────────────────────────

    #[test]
    fn rows_are_one_segment_per_line() {
        let segments = split_on_rows("id,name\n1,alpha\n\n2,beta\n");
        assert_eq!(segments, vec!["id,name", "1,alpha", "2,beta"]);
    }

    // ── Registry ────────────────────────────────────────────────────

    #[test]
    fn builtins_are_registered() {
        let registry = StrategyRegistry::new();
        for name in [
            "by_paragraph",
            "split_on_blank_lines",
            "by_slide",
            "by_email_block",
            "by_email_thread",
            "by_sentence",
            "split_on_rows",
        ] {
            assert!(registry.contains(name), "missing builtin {name}");
        }
    }

    #[test]
    fn alias_matches_by_paragraph() {
        let registry = StrategyRegistry::new();
        let text = "A.\n\nB.";
        assert_eq!(
            registry.segment("split_on_blank_lines", text),
            registry.segment("by_paragraph", text)
        );
    }

    #[test]
    fn unknown_strategy_falls_back_to_paragraphs() {
        let registry = StrategyRegistry::new();
        let segments = registry.segment("blank_line", "A.\n\nB.");
        assert_eq!(segments, vec!["A.", "B."]);
    }

    #[test]
    fn register_custom_strategy() {
        let mut registry = StrategyRegistry::new();
        registry
            .register("by_pipe", |text: &str| {
                text.split('|').map(|s| s.trim().to_string()).collect()
            })
            .unwrap();
        assert_eq!(registry.segment("by_pipe", "a | b"), vec!["a", "b"]);
    }

    #[test]
    fn reregistering_a_builtin_is_an_error() {
        let mut registry = StrategyRegistry::new();
        let err = registry.register("by_paragraph", |_| Vec::new()).unwrap_err();
        assert!(matches!(err, StrategyError::Duplicate(name) if name == "by_paragraph"));
    }

    #[test]
    fn override_is_explicit() {
        let mut registry = StrategyRegistry::new();
        registry.override_strategy("by_paragraph", |_| vec!["overridden".to_string()]);
        assert_eq!(registry.segment("by_paragraph", "anything"), vec!["overridden"]);
    }
}
