//! Constraint name extraction from opaque storage failures
//!
//! Best-effort heuristic over driver message text: find the token
//! `constraint` (case-insensitive), prefer the first double-quoted span after
//! it, then the first parenthesized span. The cause chain is walked from the
//! outermost failure inward and the first non-empty match wins. Structured
//! constraint names reported by the storage layer always take precedence over
//! this; the heuristic is the last resort.

use std::error::Error;

/// Walks the failure's cause chain and returns the first constraint
/// identifier found in any level's message text.
pub fn constraint_name(failure: &(dyn Error + 'static)) -> Option<String> {
    let mut level: Option<&(dyn Error + 'static)> = Some(failure);
    while let Some(err) = level {
        if let Some(name) = from_message(&err.to_string()) {
            return Some(name);
        }
        level = err.source();
    }
    None
}

/// Pulls a constraint identifier out of a single message, or `None`.
pub fn from_message(message: &str) -> Option<String> {
    let bytes = message.as_bytes();
    let token = b"constraint";
    let at = bytes
        .windows(token.len())
        .position(|w| w.eq_ignore_ascii_case(token))?;
    let tail = &message[at..];

    if let Some(name) = delimited(tail, '"', '"') {
        return Some(name);
    }
    delimited(tail, '(', ')')
}

fn delimited(text: &str, open: char, close: char) -> Option<String> {
    let start = text.find(open)? + open.len_utf8();
    let len = text[start..].find(close)?;
    let span = &text[start..start + len];
    if span.is_empty() {
        None
    } else {
        Some(span.to_string())
    }
}
