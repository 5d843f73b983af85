//! Query-term highlighting for result text.
//!
//! Marks every case-insensitive occurrence of each query word longer than
//! [`HIGHLIGHT_MIN_WORD_CHARS`] characters. Matching is by substring, so
//! "learn" also marks the start of "learning".

use crate::config::HIGHLIGHT_MIN_WORD_CHARS;
use regex::{Regex, RegexBuilder};
use tracing::warn;

/// Byte range `[start, end)` of `text` to highlight; always on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Case-insensitive alternation of the query words eligible for highlighting.
///
/// Longer words come first so that, at a given position, the longest word wins.
/// Returns `None` when no word is long enough.
fn term_pattern(query: &str) -> Option<Regex> {
    let mut terms: Vec<&str> = query
        .split_whitespace()
        .filter(|w| w.chars().count() > HIGHLIGHT_MIN_WORD_CHARS)
        .collect();
    if terms.is_empty() {
        return None;
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()));

    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&alternation).case_insensitive(true).build() {
        Ok(pattern) => Some(pattern),
        Err(e) => {
            warn!("Failed to build highlight pattern: {}", e);
            None
        }
    }
}

/// Returns sorted, merged spans of `text` matching any query word.
pub fn highlight_spans(text: &str, query: &str) -> Vec<Span> {
    let Some(pattern) = term_pattern(query) else {
        return Vec::new();
    };

    let spans = pattern
        .find_iter(text)
        .map(|m| Span {
            start: m.start(),
            end: m.end(),
        })
        .collect();

    merge_spans(spans)
}

/// Merges overlapping or touching spans. Input must be sorted by `start`.
fn merge_spans(spans: Vec<Span>) -> Vec<Span> {
    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Wraps each highlighted span of `text` in `open` / `close`.
///
/// # Examples
///
/// ```
/// use semsearch_core::highlight::highlight;
///
/// let marked = highlight("Machine learning is a subset", "LEARN", "**", "**");
/// assert_eq!(marked, "Machine **learn**ing is a subset");
/// ```
pub fn highlight(text: &str, query: &str, open: &str, close: &str) -> String {
    let spans = highlight_spans(text, query);
    if spans.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + spans.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for span in spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str(open);
        out.push_str(&text[span.start..span.end]);
        out.push_str(close);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}
