// tfcorpus-core/src/comments.rs
//! Comment stripper.
//!
//! Block comments go first, across line boundaries. The remaining text is then
//! handled line by line:
//!
//! * `##` and `///` lines are documentation and kept verbatim.
//! * Lines starting with `#` or `//` are dropped.
//! * Anything else is cut at the first `#` or `//` found outside a string
//!   literal, then right-trimmed, and dropped if nothing is left.
//!
//! String tracking is deliberately simple: there is no escape handling, and in
//! the default [`QuoteTracking::Conflated`] mode any quote character flips the
//! in-string state, so `"it's" # note` is not truncated.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::formatting::split_lines;

static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// How the inline scanner decides whether it is inside a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteTracking {
    /// Any `"` or `'` toggles the in-string flag regardless of which quote
    /// opened the string.
    #[default]
    Conflated,
    /// A string opened by one quote kind is only closed by the same kind.
    KindAware,
}

/// Strips comments using the default [`QuoteTracking::Conflated`] mode.
pub fn strip_comments(content: &str) -> String {
    strip_comments_with(content, QuoteTracking::Conflated)
}

pub fn strip_comments_with(content: &str, tracking: QuoteTracking) -> String {
    let without_blocks = BLOCK_COMMENT.replace_all(content, "");

    let mut kept: Vec<&str> = Vec::new();
    for line in split_lines(&without_blocks) {
        let lead = line.trim_start();

        if lead.starts_with("##") || lead.starts_with("///") {
            kept.push(line);
            continue;
        }

        if lead.starts_with('#') || lead.starts_with("//") {
            continue;
        }

        let code = truncate_inline_comment(line, tracking).trim_end();
        if !code.is_empty() {
            kept.push(code);
        }
    }

    kept.join("\n")
}

/// Returns `line` up to (not including) the first comment introducer that is
/// outside a string literal.
pub fn truncate_inline_comment(line: &str, tracking: QuoteTracking) -> &str {
    let bytes = line.as_bytes();
    let mut open_quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' => {
                open_quote = match (tracking, open_quote) {
                    (_, None) => Some(b),
                    (QuoteTracking::Conflated, Some(_)) => None,
                    (QuoteTracking::KindAware, Some(q)) if q == b => None,
                    (QuoteTracking::KindAware, Some(q)) => Some(q),
                };
            }
            b'#' if open_quote.is_none() => return &line[..i],
            b'/' if open_quote.is_none() && bytes.get(i + 1) == Some(&b'/') => {
                return &line[..i];
            }
            _ => {}
        }
        i += 1;
    }

    line
}
