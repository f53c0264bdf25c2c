//! Markdown to plain text for indexing.
//!
//! This is a lossy, regex-driven pass. Its output is only ever searched and
//! excerpted, never rendered, so it doesn't try to be a markdown parser.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::unwrap_used)]
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());

#[allow(clippy::unwrap_used)]
static INLINE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

#[allow(clippy::unwrap_used)]
static CODE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`{1,3}[^`]*`{1,3}").unwrap());

#[allow(clippy::unwrap_used)]
static BULLET_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[-*+]\s+").unwrap());

#[allow(clippy::unwrap_used)]
static ORDERED_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s+").unwrap());

#[allow(clippy::unwrap_used)]
static TABLE_DELIMITER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*[-:]+\s*\|").unwrap());

#[allow(clippy::unwrap_used)]
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

#[allow(clippy::unwrap_used)]
static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,3}[ \t]+(.+)$").unwrap());

/// Reduce raw markdown to searchable plain text.
///
/// Steps run in a fixed order: heading markers, links to their text, code
/// spans dropped, list markers, table delimiter cells, blank-line runs,
/// then a final trim.
pub fn sanitize_body(markdown: &str) -> String {
    let text = HEADING_MARKER.replace_all(markdown, "");
    let text = INLINE_LINK.replace_all(&text, "$1");
    let text = CODE_SPAN.replace_all(&text, "");
    let text = BULLET_MARKER.replace_all(&text, "");
    let text = ORDERED_MARKER.replace_all(&text, "");
    let text = TABLE_DELIMITER.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Texts of level 1-3 headings, in order of appearance.
pub fn extract_headings(markdown: &str) -> Vec<String> {
    HEADING_LINE
        .captures_iter(markdown)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}
