//! Term-frequency-free scoring over a [`SearchIndex`].
//!
//! Each query term contributes a fixed weight for every field that contains
//! it. There is no tokenization beyond whitespace splitting and no
//! stemming: containment is plain substring matching on lower-cased text.

use crate::{IndexedDocument, SearchIndex, SearchResult};

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;

const TITLE_WEIGHT: u32 = 10;
const HEADING_WEIGHT: u32 = 5;
const BODY_WEIGHT: u32 = 1;

/// Characters kept on each side of a body match.
const EXCERPT_RADIUS: usize = 100;
/// Excerpt length when only the title or headings matched.
const EXCERPT_FALLBACK: usize = 150;

/// Split a query into lower-cased terms. Duplicates are kept.
pub fn query_terms(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Rank `index` against `query`, best first, at most `limit` results.
///
/// Ties keep index order.
pub fn search(index: &SearchIndex, query: &str, limit: usize) -> Vec<SearchResult> {
    if query.trim().chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let terms = query_terms(query);
    if terms.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(u32, SearchResult)> = index
        .documents
        .iter()
        .filter_map(|doc| score_document(doc, &terms))
        .collect();

    // `sort_by` is stable.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(limit);
    scored.into_iter().map(|(_, result)| result).collect()
}

fn score_document(doc: &IndexedDocument, terms: &[String]) -> Option<(u32, SearchResult)> {
    let title = doc.title.to_lowercase();
    let headings = doc.headings.join(" ").to_lowercase();
    let body = LoweredText::new(&doc.body);

    let mut score = 0;
    let mut first_body_match: Option<usize> = None;
    for term in terms {
        if title.contains(term.as_str()) {
            score += TITLE_WEIGHT;
        }
        if headings.contains(term.as_str()) {
            score += HEADING_WEIGHT;
        }
        if let Some(at) = body.find_char(term) {
            score += BODY_WEIGHT;
            first_body_match.get_or_insert(at);
        }
    }

    (score > 0).then(|| {
        (
            score,
            SearchResult {
                title: doc.title.clone(),
                path: doc.route.clone(),
                excerpt: excerpt(&doc.body, first_body_match),
            },
        )
    })
}

/// Lower-cased copy of a text that can map match offsets back to char
/// positions in the original. Lower-casing may change a char's length, so
/// the byte offsets of the two strings don't line up.
struct LoweredText {
    lowered: String,
    /// `(byte offset in lowered, char index in original)` per original char.
    starts: Vec<(usize, usize)>,
}

impl LoweredText {
    fn new(text: &str) -> Self {
        let mut lowered = String::with_capacity(text.len());
        let mut starts = Vec::with_capacity(text.len());
        for (char_idx, c) in text.chars().enumerate() {
            starts.push((lowered.len(), char_idx));
            lowered.extend(c.to_lowercase());
        }
        Self { lowered, starts }
    }

    /// Char index in the original text where `term` first occurs.
    fn find_char(&self, term: &str) -> Option<usize> {
        let byte = self.lowered.find(term)?;
        let pos = self.starts.partition_point(|&(start, _)| start <= byte);
        Some(pos.checked_sub(1).map_or(0, |i| self.starts[i].1))
    }
}

/// Build the display excerpt for a result.
fn excerpt(body: &str, match_char: Option<usize>) -> String {
    let window: String = match match_char {
        Some(at) => {
            let start = at.saturating_sub(EXCERPT_RADIUS);
            let end = at + EXCERPT_RADIUS;
            body.chars().skip(start).take(end - start).collect()
        },
        None => body.chars().take(EXCERPT_FALLBACK).collect(),
    };

    let cleaned = window.split_whitespace().collect::<Vec<_>>().join(" ");
    if cleaned.chars().count() < window.chars().count() {
        format!("{cleaned}...")
    } else {
        cleaned
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Branch;
    use chrono::Utc;
    use proptest::prelude::*;

    fn doc(title: &str, route: &str, body: &str, headings: &[&str]) -> IndexedDocument {
        IndexedDocument {
            title: title.to_string(),
            route: route.to_string(),
            body: body.to_string(),
            headings: headings.iter().map(|h| (*h).to_string()).collect(),
        }
    }

    fn index(documents: Vec<IndexedDocument>) -> SearchIndex {
        SearchIndex {
            branch: Branch::new("main"),
            documents,
            built_at: Utc::now(),
        }
    }

    #[test]
    fn test_short_queries_return_nothing() {
        let idx = index(vec![doc("a", "/a", "a b c", &[])]);
        assert!(search(&idx, "", 10).is_empty());
        assert!(search(&idx, "a", 10).is_empty());
        assert!(search(&idx, "  a  ", 10).is_empty());
    }

    #[test]
    fn test_title_match_scores_at_least_ten() {
        let idx = index(vec![
            doc("Networking", "/networking", "", &[]),
            doc("Other", "/other", "nothing here", &[]),
        ]);

        let (score, _) = score_document(&idx.documents[0], &query_terms("network")).unwrap();
        assert!(score >= TITLE_WEIGHT);

        let results = search(&idx, "network", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].path, "/networking");
    }

    #[test]
    fn test_title_outranks_headings_outranks_body() {
        // Given three documents matching "deploy" in different fields
        let idx = index(vec![
            doc("Intro", "/body", "how to deploy things", &[]),
            doc("Intro", "/heading", "", &["Deploy steps"]),
            doc("Deploy", "/title", "", &[]),
        ]);

        // When searching
        let results = search(&idx, "deploy", 10);

        // Then the field weight decides the order
        let paths: Vec<_> = results.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/title", "/heading", "/body"]);
    }

    #[test]
    fn test_repeated_terms_count_again() {
        let d = doc("Cache", "/cache", "", &[]);
        let (once, _) = score_document(&d, &query_terms("cache")).unwrap();
        let (twice, _) = score_document(&d, &query_terms("cache cache")).unwrap();
        assert_eq!(twice, once * 2);
    }

    #[test]
    fn test_limit_keeps_ties_in_index_order() {
        let docs: Vec<_> = (0..50)
            .map(|i| doc(&format!("page {i}"), &format!("/p{i}"), "shared text", &[]))
            .collect();
        let idx = index(docs);

        let results = search(&idx, "shared", 10);

        assert_eq!(results.len(), 10);
        let paths: Vec<_> = results.iter().map(|r| r.path.clone()).collect();
        let expected: Vec<_> = (0..10).map(|i| format!("/p{i}")).collect();
        assert_eq!(paths, expected);
    }

    #[test]
    fn test_excerpt_is_centered_on_first_body_match() {
        let body = format!("{}needle{}", "x".repeat(300), "y".repeat(300));
        let idx = index(vec![doc("t", "/t", &body, &[])]);

        let results = search(&idx, "needle", 10);
        let excerpt = &results[0].excerpt;

        assert_eq!(excerpt.chars().count(), 200);
        assert!(excerpt.starts_with(&"x".repeat(100)));
        assert!(excerpt.contains("needle"));
        assert!(!excerpt.ends_with("..."));
    }

    #[test]
    fn test_excerpt_falls_back_to_body_prefix() {
        let body = "word ".repeat(100);
        let idx = index(vec![doc("Special", "/s", &body, &[])]);

        let results = search(&idx, "special", 10);

        // The 150-char prefix ends with a space that trimming removes.
        assert!(results[0].excerpt.ends_with("word..."));
        assert!(results[0].excerpt.starts_with("word word"));
    }

    #[test]
    fn test_excerpt_handles_multibyte_text() {
        let body = format!("{}Überprüfung der Daten {}", "ä".repeat(150), "ö".repeat(150));
        let idx = index(vec![doc("t", "/t", &body, &[])]);

        let results = search(&idx, "überprüfung", 10);

        let excerpt = &results[0].excerpt;
        assert!(excerpt.contains("Überprüfung"));
        assert!(excerpt.starts_with(&"ä".repeat(100)));
    }

    #[test]
    fn test_lowercase_expansion_maps_back_to_original_offsets() {
        // 'İ' lower-cases to two chars, shifting offsets in the lowered copy.
        let text = LoweredText::new("İİİ target");
        assert_eq!(text.find_char("target"), Some(4));
    }

    #[test]
    fn test_ellipsis_only_when_whitespace_collapsed() {
        assert_eq!(excerpt("plain words", None), "plain words");
        assert_eq!(excerpt("spaced   out", None), "spaced out...");
    }

    proptest! {
        #[test]
        fn prop_search_never_exceeds_limit(
            bodies in prop::collection::vec("\\PC{0,80}", 0..20),
            query in "\\PC{0,12}",
            limit in 0usize..15,
        ) {
            let docs = bodies
                .iter()
                .enumerate()
                .map(|(i, b)| doc(&format!("doc {i}"), &format!("/d{i}"), b, &[]))
                .collect();
            let results = search(&index(docs), &query, limit);
            prop_assert!(results.len() <= limit);
        }
    }
}
